use serde::{Deserialize, Serialize};

/// Chat datagram as sent by clients
///
/// Only `user_id` identifies the sender; the profile fields are carried for
/// display by receiving clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub user_id: u32,
    pub nickname: String,
    pub school: String,
    pub msg: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_chat_message() {
        let raw = br#"{"user_id":4,"nickname":"alice","school":"mit","msg":"hi"}"#;
        let message: ChatMessage = serde_json::from_slice(raw).unwrap();

        assert_eq!(message.user_id, 4);
        assert_eq!(message.msg, "hi");
    }

    #[test]
    fn test_missing_user_id_is_rejected() {
        let raw = br#"{"nickname":"alice","school":"mit","msg":"hi"}"#;
        assert!(serde_json::from_slice::<ChatMessage>(raw).is_err());
    }
}
