use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{JenkinsError, Result};

/// Encode build parameters as the `json` form field Jenkins expects when a
/// build is triggered:
///
/// ```text
/// {"parameter": [{"name": "param1", "value": "value1"}, ...]}
/// ```
///
/// `params` must serialise to a JSON object (`HashMap`, `IndexMap`,
/// `BTreeMap`, a struct, ...). Anything else is rejected with
/// [`JenkinsError::InvalidArgument`]. Entries come out in the order of the
/// encoded object, which is stable for a given input but should not be relied
/// on by callers.
pub fn mk_json_from_build_parameters<P>(params: &P) -> Result<String>
where
    P: Serialize + ?Sized,
{
    let encoded = serde_json::to_value(params).map_err(|e| {
        JenkinsError::InvalidArgument(format!(
            "Build parameters must be a mapping with string keys: {e}"
        ))
    })?;
    let Value::Object(map) = encoded else {
        return Err(JenkinsError::InvalidArgument(
            "Build parameters must be a mapping".to_string(),
        ));
    };

    let parameter: Vec<Value> = map
        .into_iter()
        .map(|(name, value)| json!({ "name": name, "value": value }))
        .collect();

    Ok(serde_json::to_string(&json!({ "parameter": parameter }))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use std::collections::HashMap;

    #[test]
    fn test_two_parameters() {
        let params = HashMap::from([("param1", "value1"), ("param2", "value2")]);

        let encoded = mk_json_from_build_parameters(&params).unwrap();
        let decoded: Value = serde_json::from_str(&encoded).unwrap();

        let entries = decoded["parameter"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.contains(&json!({"name": "param1", "value": "value1"})));
        assert!(entries.contains(&json!({"name": "param2", "value": "value2"})));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let mut params = IndexMap::new();
        params.insert("b".to_string(), "2".to_string());
        params.insert("a".to_string(), "1".to_string());

        let first = mk_json_from_build_parameters(&params).unwrap();
        let second = mk_json_from_build_parameters(&params).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_mapping_rejected() {
        let err = mk_json_from_build_parameters("not a dict").unwrap_err();

        assert!(matches!(err, JenkinsError::InvalidArgument(_)));
        assert_eq!(
            err.to_string(),
            "Invalid argument: Build parameters must be a mapping"
        );
    }

    #[test]
    fn test_list_rejected() {
        let err = mk_json_from_build_parameters(&vec![("param1", "value1")]).unwrap_err();
        assert!(matches!(err, JenkinsError::InvalidArgument(_)));
    }

    #[test]
    fn test_non_string_keys_rejected() {
        let params = HashMap::from([((1u8, 2u8), "value1")]);

        let err = mk_json_from_build_parameters(&params).unwrap_err();

        assert!(matches!(err, JenkinsError::InvalidArgument(_)));
        assert!(err
            .to_string()
            .starts_with("Invalid argument: Build parameters must be a mapping with string keys"));
    }

    #[test]
    fn test_struct_parameters() {
        #[derive(Serialize)]
        struct Release {
            version: String,
            dry_run: bool,
        }

        let encoded = mk_json_from_build_parameters(&Release {
            version: "1.2.0".to_string(),
            dry_run: true,
        })
        .unwrap();
        let decoded: Value = serde_json::from_str(&encoded).unwrap();

        let entries = decoded["parameter"].as_array().unwrap();
        assert!(entries.contains(&json!({"name": "dry_run", "value": true})));
        assert!(entries.contains(&json!({"name": "version", "value": "1.2.0"})));
    }
}
