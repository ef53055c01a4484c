//! Add-block dialog state and the commands that drive it.

use serde_json::Value;
use shared_types::{OpenAddBlock, EVENT_CLOSE_ADD_BLOCK, EVENT_OPEN_ADD_BLOCK};

use crate::error::CommandError;

/// Block under which new blocks get inserted
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParentRef {
    /// Reset by a close; hosts see an empty string
    #[default]
    Cleared,
    /// Opened without a parent; hosts see `null` and insert at page root
    Root,
    Block(String),
}

impl ParentRef {
    /// Host-facing id: `None` for the root marker, `""` once cleared.
    pub fn as_id(&self) -> Option<&str> {
        match self {
            ParentRef::Cleared => Some(""),
            ParentRef::Root => None,
            ParentRef::Block(id) => Some(id.as_str()),
        }
    }
}

/// Index among the parent's children, or the end of the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertPosition {
    #[default]
    Append,
    At(u32),
}

impl InsertPosition {
    /// Only non-negative integral numbers select an index.
    pub fn from_json(value: Option<&Value>) -> Self {
        let index = match value {
            Some(Value::Number(n)) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            }),
            _ => None,
        };
        index
            .and_then(|n| u32::try_from(n).ok())
            .map(InsertPosition::At)
            .unwrap_or(InsertPosition::Append)
    }

    /// Host-facing index; `-1` means append.
    pub fn as_index(&self) -> i64 {
        match self {
            InsertPosition::Append => -1,
            InsertPosition::At(n) => i64::from(*n),
        }
    }
}

/// Where the picker panel should insert the chosen block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionPoint {
    pub parent: ParentRef,
    pub position: InsertPosition,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BuilderCommand {
    OpenAddBlock(Option<OpenAddBlock>),
    CloseAddBlock,
}

impl BuilderCommand {
    /// Parses a named event as published by hosts that still use the
    /// string event bus.
    pub fn from_event(name: &str, payload: Option<&Value>) -> Result<Self, CommandError> {
        match name {
            EVENT_OPEN_ADD_BLOCK => {
                let payload = match payload {
                    None | Some(Value::Null) => None,
                    Some(value) => Some(serde_json::from_value(value.clone()).map_err(|e| {
                        CommandError::InvalidPayload {
                            event: name.to_string(),
                            reason: e.to_string(),
                        }
                    })?),
                };
                Ok(BuilderCommand::OpenAddBlock(payload))
            }
            EVENT_CLOSE_ADD_BLOCK => Ok(BuilderCommand::CloseAddBlock),
            other => Err(CommandError::UnknownEvent(other.to_string())),
        }
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            BuilderCommand::OpenAddBlock(_) => EVENT_OPEN_ADD_BLOCK,
            BuilderCommand::CloseAddBlock => EVENT_CLOSE_ADD_BLOCK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddBlockDialogState {
    pub parent: ParentRef,
    pub position: InsertPosition,
    pub open: bool,
}

impl AddBlockDialogState {
    pub fn open(&mut self, payload: Option<&OpenAddBlock>) {
        self.parent = match payload.and_then(|p| p.parent_id.clone()) {
            Some(id) => ParentRef::Block(id),
            None => ParentRef::Root,
        };
        self.position = InsertPosition::from_json(payload.and_then(|p| p.position.as_ref()));
        self.open = true;
        tracing::debug!(
            parent = ?self.parent.as_id(),
            position = self.position.as_index(),
            "Add-block dialog opened"
        );
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    /// Backdrop click or close button.
    pub fn dismiss(&mut self) {
        if self.open {
            tracing::debug!("Add-block dialog dismissed");
        }
        self.close();
    }

    pub fn apply(&mut self, command: &BuilderCommand) {
        match command {
            BuilderCommand::OpenAddBlock(payload) => self.open(payload.as_ref()),
            BuilderCommand::CloseAddBlock => self.close(),
        }
    }

    pub fn insertion_point(&self) -> Option<InsertionPoint> {
        self.open.then(|| InsertionPoint {
            parent: self.parent.clone(),
            position: self.position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_position_resolution() {
        assert_eq!(InsertPosition::from_json(None), InsertPosition::Append);
        assert_eq!(InsertPosition::from_json(Some(&json!(2))), InsertPosition::At(2));
        assert_eq!(InsertPosition::from_json(Some(&json!(0))), InsertPosition::At(0));
        assert_eq!(InsertPosition::from_json(Some(&json!(-1))), InsertPosition::Append);
        assert_eq!(InsertPosition::from_json(Some(&json!(1.5))), InsertPosition::Append);
        assert_eq!(InsertPosition::from_json(Some(&json!(3.0))), InsertPosition::At(3));
        assert_eq!(InsertPosition::from_json(Some(&json!("3"))), InsertPosition::Append);
        assert_eq!(InsertPosition::from_json(Some(&json!(null))), InsertPosition::Append);
        assert_eq!(InsertPosition::Append.as_index(), -1);
    }

    #[test]
    fn test_open_without_payload_targets_root() {
        let mut dialog = AddBlockDialogState::default();
        dialog.open(None);
        assert!(dialog.open);
        assert_eq!(dialog.parent, ParentRef::Root);
        assert_eq!(dialog.parent.as_id(), None);
        assert_eq!(dialog.position, InsertPosition::Append);
    }

    #[test]
    fn test_open_without_id_targets_root() {
        let mut dialog = AddBlockDialogState::default();
        dialog.open(Some(&OpenAddBlock {
            parent_id: None,
            position: Some(json!(4)),
        }));
        assert_eq!(dialog.parent, ParentRef::Root);
        assert_eq!(dialog.position, InsertPosition::At(4));
    }

    #[test]
    fn test_close_resets_from_any_state() {
        let mut dialog = AddBlockDialogState::default();
        dialog.close();
        assert_eq!(dialog, AddBlockDialogState::default());

        dialog.open(Some(&OpenAddBlock::new("node-1", 3)));
        dialog.close();
        assert_eq!(dialog.parent.as_id(), Some(""));
        assert_eq!(dialog.position.as_index(), -1);
        assert!(!dialog.open);
        assert!(dialog.insertion_point().is_none());
    }

    #[test]
    fn test_from_event() {
        let open =
            BuilderCommand::from_event("OPEN_ADD_BLOCK", Some(&json!({"_id": "a", "position": 1})))
                .unwrap();
        assert_eq!(open, BuilderCommand::OpenAddBlock(Some(OpenAddBlock::new("a", 1))));
        assert_eq!(open.event_name(), "OPEN_ADD_BLOCK");

        assert_eq!(
            BuilderCommand::from_event("OPEN_ADD_BLOCK", None).unwrap(),
            BuilderCommand::OpenAddBlock(None)
        );
        assert_eq!(
            BuilderCommand::from_event("CLOSE_ADD_BLOCK", Some(&json!({}))).unwrap(),
            BuilderCommand::CloseAddBlock
        );
        assert!(matches!(
            BuilderCommand::from_event("OPEN_ADD_BLOCK", Some(&json!("node-1"))),
            Err(CommandError::InvalidPayload { event, .. }) if event == "OPEN_ADD_BLOCK"
        ));
        assert!(matches!(
            BuilderCommand::from_event("SAVE_PAGE", None),
            Err(CommandError::UnknownEvent(name)) if name == "SAVE_PAGE"
        ));
    }
}
