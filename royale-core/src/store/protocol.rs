//! Defines the JSON protocol used for communication between royale
//! and store backend binaries over stdin/stdout.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

pub trait StoreCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    ListAll,
    Delete,
    Insert,
}

/// Request sent from royale to the store backend.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Response sent from the store backend to royale.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success { data: T },
    Error { error: String },
}

impl<T: Serialize> Response<T> {
    pub fn success(data: T) -> String {
        serde_json::to_string(&Response::Success { data }).unwrap()
    }
}

impl Response<()> {
    pub fn error(msg: &str) -> String {
        serde_json::to_string(&Response::<()>::Error {
            error: msg.to_string(),
        })
        .unwrap()
    }
}

/// Enumerate every document id in a collection.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListAll {
    pub collection: String,
}

impl StoreCommand for ListAll {
    type Response = Vec<String>;
    fn command() -> Command {
        Command::ListAll
    }
}

/// Delete a document by id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Delete {
    pub collection: String,
    pub doc_id: String,
}

impl StoreCommand for Delete {
    type Response = ();
    fn command() -> Command {
        Command::Delete
    }
}

/// Insert a new document; the backend assigns and returns the id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Insert {
    pub collection: String,
    pub record: serde_json::Value,
}

impl StoreCommand for Insert {
    type Response = String;
    fn command() -> Command {
        Command::Insert
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_roundtrip() {
        let request = Request {
            command: Command::Delete,
            params: json!({"collection": "classSchedules", "doc_id": "abc"}),
        };

        let encoded = serde_json::to_string(&request).unwrap();
        assert!(encoded.contains("\"delete\""));

        let decoded: Request = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.command, Command::Delete);
        assert_eq!(decoded.params["doc_id"], "abc");
    }

    #[test]
    fn test_response_envelopes() {
        let ok = Response::success(vec!["id-1".to_string()]);
        let decoded: Response<Vec<String>> = serde_json::from_str(&ok).unwrap();
        assert!(matches!(decoded, Response::Success { data } if data == ["id-1"]));

        let err = Response::error("collection unavailable");
        let decoded: Response<Vec<String>> = serde_json::from_str(&err).unwrap();
        assert!(matches!(decoded, Response::Error { error } if error == "collection unavailable"));
    }
}
