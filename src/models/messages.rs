use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoomMessage {
    pub room_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EditMessage {
    pub room_id: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct PingMessage {}

/// Role of a connection within its room
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "Mentor")]
    Owner,
    #[serde(rename = "Student")]
    Participant,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignedMessage {
    pub role: Role,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DocumentMessage {
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ParticipantCountMessage {
    pub count: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PongMessage {
    pub date: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ReceivedMessage {
    #[serde(rename = "join")]
    Join(RoomMessage),
    #[serde(rename = "leave")]
    Leave(RoomMessage),
    #[serde(rename = "edit")]
    Edit(EditMessage),
    #[serde(rename = "ping")]
    Ping(PingMessage),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum SendMessage {
    #[serde(rename = "roleAssigned")]
    RoleAssigned(RoleAssignedMessage),
    #[serde(rename = "documentSync")]
    DocumentSync(DocumentMessage),
    #[serde(rename = "participantCount")]
    ParticipantCount(ParticipantCountMessage),
    #[serde(rename = "documentChanged")]
    DocumentChanged(DocumentMessage),
    #[serde(rename = "ownerLeft")]
    OwnerLeft,
    #[serde(rename = "pong")]
    Pong(PongMessage),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_client_messages() {
        let join: ReceivedMessage = serde_json::from_str(r#"{"type":"join","roomId":"42"}"#).unwrap();
        assert_eq!(join, ReceivedMessage::Join(RoomMessage { room_id: "42".to_string() }));

        let edit: ReceivedMessage =
            serde_json::from_str(r#"{"type":"edit","roomId":"42","content":"let x = 1;"}"#).unwrap();
        assert_eq!(
            edit,
            ReceivedMessage::Edit(EditMessage { room_id: "42".to_string(), content: "let x = 1;".to_string() })
        );

        let ping: ReceivedMessage = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert_eq!(ping, ReceivedMessage::Ping(PingMessage {}));
    }

    #[test]
    fn test_reject_unknown_or_incomplete_messages() {
        assert!(serde_json::from_str::<ReceivedMessage>(r#"{"type":"shout","roomId":"42"}"#).is_err());
        assert!(serde_json::from_str::<ReceivedMessage>(r#"{"type":"edit","roomId":"42"}"#).is_err());
        assert!(serde_json::from_str::<ReceivedMessage>("not json").is_err());
    }

    #[test]
    fn test_server_message_shape() {
        let role = SendMessage::RoleAssigned(RoleAssignedMessage { role: Role::Owner });
        assert_eq!(serde_json::to_value(&role).unwrap(), json!({"type": "roleAssigned", "role": "Mentor"}));

        let count = SendMessage::ParticipantCount(ParticipantCountMessage { count: 2 });
        assert_eq!(serde_json::to_value(&count).unwrap(), json!({"type": "participantCount", "count": 2}));

        assert_eq!(serde_json::to_value(&SendMessage::OwnerLeft).unwrap(), json!({"type": "ownerLeft"}));
    }
}
