//! Node + derived properties → the record handed to the renderer.

use crate::accessors::REGISTRY;
use crate::error::DecorateError;
use crate::model::Node;
use serde::Serialize;
use serde_json::{Map, Value};

/// A node's own fields with every registry key merged over them.
///
/// Absent derived values are stored as `null`, so every registry key is
/// always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AugmentedRecord(Map<String, Value>);

impl AugmentedRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The key exists and holds a non-null value.
    pub fn has(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(|v| !v.is_null())
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Apply every accessor to `node` and merge the results over its fields.
/// Accessor values win on key collision.
pub fn decorate(node: &Node<'_>) -> Result<AugmentedRecord, DecorateError> {
    tracing::trace!(node_type = node.node_type(), "decorating node");
    let mut record = node.fields().clone();
    for accessor in REGISTRY {
        let value = (accessor.derive)(node)?;
        record.insert(accessor.key.to_string(), value.unwrap_or(Value::Null));
    }
    Ok(AugmentedRecord(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token() -> Value {
        json!({
            "nodeType": "ContractDefinition", "id": 7, "name": "Token", "contractKind": "contract",
            "src": "0:400:0",
            "documentation": { "nodeType": "StructuredDocumentation", "src": "0:20:0",
                               "text": "@title A token\n@notice Fungible." },
            "nodes": [
                { "nodeType": "EventDefinition", "name": "Transfer", "src": "30:50:0",
                  "parameters": { "nodeType": "ParameterList", "src": "44:30:0", "parameters": [
                      { "nodeType": "VariableDeclaration", "name": "from", "src": "45:12:0",
                        "typeDescriptions": { "typeString": "address" } },
                      { "nodeType": "VariableDeclaration", "name": "value", "src": "60:13:0",
                        "typeDescriptions": { "typeString": "uint256" } }
                  ]}},
                { "nodeType": "FunctionDefinition", "name": "balanceOf", "kind": "function",
                  "src": "100:80:0", "visibility": "external", "stateMutability": "view",
                  "virtual": true,
                  "documentation": { "nodeType": "StructuredDocumentation", "src": "90:9:0",
                                     "text": "@param who Account\n@return The balance" },
                  "parameters": { "nodeType": "ParameterList", "src": "120:11:0", "parameters": [
                      { "nodeType": "VariableDeclaration", "name": "who", "src": "121:11:0",
                        "typeDescriptions": { "typeString": "address" } }
                  ]},
                  "returnParameters": { "nodeType": "ParameterList", "src": "150:9:0",
                                        "parameters": [
                      { "nodeType": "VariableDeclaration", "name": "", "src": "151:7:0",
                        "typeDescriptions": { "typeString": "uint256" } }
                  ]}}
            ]
        })
    }

    #[test]
    fn record_has_every_field_and_every_registry_key() {
        let ast = token();
        let node = Node::from_json(&ast).unwrap();
        let record = decorate(&node).unwrap();

        for key in ast.as_object().unwrap().keys() {
            assert!(record.get(key).is_some(), "missing source field {key}");
        }
        for accessor in REGISTRY {
            assert!(record.get(accessor.key).is_some(), "missing registry key {}", accessor.key);
        }
        assert_eq!(record.get("id"), Some(&json!(7)));
    }

    #[test]
    fn inapplicable_values_are_null_not_missing() {
        let ast = token();
        let record = decorate(&Node::from_json(&ast).unwrap()).unwrap();
        assert_eq!(record.get("signature"), Some(&Value::Null));
        assert_eq!(record.get("visibility"), Some(&Value::Null));
        assert!(!record.has("signature"));
        assert!(record.has("name"));
    }

    #[test]
    fn accessor_keys_override_source_fields() {
        let ast = json!({
            "nodeType": "FunctionDefinition", "name": "", "kind": "constructor",
            "virtual": false, "modifiers": [],
            "parameters": { "nodeType": "ParameterList", "parameters": [] }
        });
        let record = decorate(&Node::from_json(&ast).unwrap()).unwrap();
        assert_eq!(record.get_str("name"), Some("constructor"));
        // raw `virtual: false` is replaced by the absent flag
        assert_eq!(record.get("virtual"), Some(&Value::Null));
        assert_eq!(record.get("modifiers"), Some(&json!([])));
    }

    #[test]
    fn decoration_does_not_touch_the_tree() {
        let ast = token();
        let before = ast.clone();
        let node = Node::from_json(&ast).unwrap();
        let _ = decorate(&node).unwrap();
        assert_eq!(ast, before);
        assert_eq!(node.fields(), before.as_object().unwrap());
    }

    #[test]
    fn nested_collections_are_decorated() {
        let ast = token();
        let record = decorate(&Node::from_json(&ast).unwrap()).unwrap();
        let value = record.into_value();

        assert_eq!(value["type"], json!("Contract"));
        assert_eq!(value["natspec"]["title"], json!("A token"));
        assert_eq!(value["natspec"]["summary"], json!("Fungible."));
        assert_eq!(value["hasPublicMembers"], json!(true));
        assert_eq!(value["notTest"], json!(true));

        let event = &value["events"][0];
        assert_eq!(event["signature"], json!("Transfer(address,uint256)"));

        let func = &value["functions"][0];
        assert_eq!(func["signature"], json!("balanceOf(address)"));
        assert_eq!(func["stateMutability"], json!("view"));
        assert_eq!(func["virtual"], json!("virtual"));
        assert_eq!(func["visibility"], json!("external"));
        assert_eq!(
            func["params"],
            json!([{ "name": "who", "type": "address", "natspec": "Account" }])
        );
        assert_eq!(
            func["returns"],
            json!([{ "name": "", "type": "uint256", "natspec": "The balance" }])
        );
        assert_eq!(value["publicExternalFunctions"][0]["name"], json!("balanceOf"));
        assert_eq!(value["variables"], json!([]));
        assert_eq!(value["items"].as_array().map(Vec::len), Some(2));
    }
}
