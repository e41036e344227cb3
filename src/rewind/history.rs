use crate::models::{MESSAGE_TYPE_ASSISTANT, MessageRecord};

/// Role names in the chat client's wire format
pub const CLIENT_ROLE_USER: &str = "user";
pub const CLIENT_ROLE_MODEL: &str = "model";

/// UI-facing transcript item. The id is a presentational 1-based ordinal
/// regenerated from position on every hydration, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    pub id: usize,
    pub message_type: String,
    pub text: String,
}

/// One turn in the live chat client's wire format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientTurn {
    pub role: String,
    pub parts: Vec<String>,
}

/// Convert persisted messages into both derived histories: the UI transcript
/// (fresh display ordinals) and the client turn list (assistant messages as
/// model turns, everything else as user turns).
///
/// Both are derived whole from the given messages, never patched, so they
/// cannot drift from the persisted truth.
pub fn convert_messages(messages: &[MessageRecord]) -> (Vec<HistoryItem>, Vec<ClientTurn>) {
    let mut ui_history = Vec::with_capacity(messages.len());
    let mut client_history = Vec::with_capacity(messages.len());

    for (index, message) in messages.iter().enumerate() {
        let text = message.content.to_text();

        ui_history.push(HistoryItem {
            id: index + 1,
            message_type: message.message_type.clone(),
            text: text.clone(),
        });

        let role = if message.message_type == MESSAGE_TYPE_ASSISTANT {
            CLIENT_ROLE_MODEL
        } else {
            CLIENT_ROLE_USER
        };
        client_history.push(ClientTurn { role: role.to_string(), parts: vec![text] });
    }

    (ui_history, client_history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MESSAGE_TYPE_USER, MessageRecord};

    #[test]
    fn test_convert_assigns_one_based_ids() {
        let messages = vec![
            MessageRecord::new(MESSAGE_TYPE_USER, "hi"),
            MessageRecord::new(MESSAGE_TYPE_ASSISTANT, "hello"),
        ];

        let (ui, _) = convert_messages(&messages);
        assert_eq!(ui[0].id, 1);
        assert_eq!(ui[1].id, 2);
        assert_eq!(ui[0].text, "hi");
    }

    #[test]
    fn test_convert_maps_roles_to_wire_format() {
        let messages = vec![
            MessageRecord::new(MESSAGE_TYPE_USER, "hi"),
            MessageRecord::new(MESSAGE_TYPE_ASSISTANT, "hello"),
            MessageRecord::new("info", "notice"),
        ];

        let (_, client) = convert_messages(&messages);
        assert_eq!(client[0].role, CLIENT_ROLE_USER);
        assert_eq!(client[1].role, CLIENT_ROLE_MODEL);
        assert_eq!(client[2].role, CLIENT_ROLE_USER);
        assert_eq!(client[1].parts, vec!["hello".to_string()]);
    }

    #[test]
    fn test_convert_empty_messages() {
        let (ui, client) = convert_messages(&[]);
        assert!(ui.is_empty());
        assert!(client.is_empty());
    }
}
