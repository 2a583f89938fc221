//! Transcript of the assistant conversation.

pub const WELCOME_MESSAGE: &str =
    "Hello! I am your StockIQ assistant. How can I help? You can ask me to \"analyze tatasteel\".";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: u64,
    pub sender: Sender,
    pub text: String,
    pub edited: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl ChatLog {
    pub fn with_welcome() -> Self {
        let mut log = Self::default();
        log.push(Sender::Bot, WELCOME_MESSAGE);
        log
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push(&mut self, sender: Sender, text: impl Into<String>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.messages.push(ChatMessage { id, sender, text: text.into(), edited: false });
        id
    }

    /// Replace the text of one of the user's messages and return the text
    /// to submit again. Bot messages cannot be edited.
    pub fn edit(&mut self, id: u64, text: &str) -> Option<String> {
        let message = self.messages.iter_mut().find(|m| m.id == id && m.sender == Sender::User)?;
        message.text = text.to_string();
        message.edited = true;
        Some(message.text.clone())
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

/// Piece of a bot message; `**text**` marks emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Strong(&'a str),
}

pub fn segments(text: &str) -> Vec<Segment<'_>> {
    text.split("**")
        .enumerate()
        .filter(|(_, part)| !part.is_empty())
        .map(|(i, part)| if i % 2 == 1 { Segment::Strong(part) } else { Segment::Plain(part) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_user_messages_are_editable() {
        let mut log = ChatLog::with_welcome();
        let question = log.push(Sender::User, "analyze tsc");
        assert_eq!(log.edit(1, "nope"), None);
        assert_eq!(log.edit(question, "analyze tcs").as_deref(), Some("analyze tcs"));
        assert!(log.messages()[1].edited);
        assert!(!log.messages()[0].edited);
    }

    #[test]
    fn emphasis_is_split_out() {
        assert_eq!(
            segments("price of **TCS.NS** is **₹1.00**."),
            [
                Segment::Plain("price of "),
                Segment::Strong("TCS.NS"),
                Segment::Plain(" is "),
                Segment::Strong("₹1.00"),
                Segment::Plain("."),
            ]
        );
    }
}
