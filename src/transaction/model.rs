use serde::{Deserialize, Serialize};

/// A transfer waiting in the pending pool or sealed into a block.
///
/// No ownership or double-spend rules apply; a sender of `"0"` is the
/// convention for mining rewards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: u64,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: u64) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Transaction;

    #[test]
    fn serializes_with_plain_field_names() {
        let tx = Transaction::new("alice", "bob", 5);
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["sender"], "alice");
        assert_eq!(json["recipient"], "bob");
        assert_eq!(json["amount"], 5);
    }
}
