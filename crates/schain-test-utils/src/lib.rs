//! Testing utilities for the schain-fragments workspace
//!
//! Bid request fixtures shared by the integration tests.

#![allow(missing_docs)]

use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeFixture {
    pub asi: String,
    pub sid: String,
    pub params: Option<String>,
    pub replace: Option<String>,
}

impl NodeFixture {
    pub fn new(asi: &str, sid: &str) -> Self {
        Self {
            asi: asi.to_string(),
            sid: sid.to_string(),
            params: None,
            replace: None,
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: &str) -> Self {
        self.params = Some(params.to_string());
        self
    }

    #[must_use]
    pub fn with_replace(mut self, replace: &str) -> Self {
        self.replace = Some(replace.to_string());
        self
    }

    pub fn to_json(&self) -> Value {
        let mut node = Map::new();
        node.insert("asi".into(), Value::String(self.asi.clone()));
        node.insert("sid".into(), Value::String(self.sid.clone()));
        node.insert("hp".into(), json!(1));
        if let Some(params) = &self.params {
            node.insert("params".into(), Value::String(params.clone()));
        }
        if let Some(replace) = &self.replace {
            node.insert("replace".into(), Value::String(replace.clone()));
        }
        Value::Object(node)
    }
}

pub fn test_app() -> Value {
    json!({
        "bundle": "com.app.test",
        "cat": ["IAB22", "IAB33", "IAB44"],
        "domain": "com.app.test",
        "id": "123456",
        "name": "TestApp",
        "publisher": {"id": "12345"},
        "storeurl": "https://play.google.com/store/apps/details?id=com.app.test"
    })
}

pub fn bid_request_without_schain() -> Vec<u8> {
    json!({"id": "BidRequest2", "app": test_app()})
        .to_string()
        .into_bytes()
}

pub fn bid_request_with_nodes(nodes: &[NodeFixture]) -> Vec<u8> {
    let nodes: Vec<Value> = nodes.iter().map(NodeFixture::to_json).collect();
    json!({
        "id": "BidRequest2",
        "app": test_app(),
        "source": {
            "ext": {
                "schain": {"ver": "1.0", "complete": 1, "nodes": nodes}
            }
        }
    })
    .to_string()
    .into_bytes()
}

/// directseller → reseller → exchange-1 → exchange-2
pub fn four_node_chain() -> Vec<NodeFixture> {
    vec![
        NodeFixture::new("directseller.com", "111111"),
        NodeFixture::new("reseller.com", "222222"),
        NodeFixture::new("exchange-1.com", "333333"),
        NodeFixture::new("exchange-2.com", "444444"),
    ]
}

pub fn identity_fragment(index: usize, asi: &str, sid: &str) -> String {
    format!("&schain.[{index}].asi={asi}&schain.[{index}].sid={sid}")
}
