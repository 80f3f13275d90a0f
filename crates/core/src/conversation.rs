//! Conversation-related types.

/// Identifier of an assistant or error turn.
///
/// Ids are allocated by the controller and are unique within one
/// controller instance. They key the reveal animation state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TurnId(pub(crate) u64);

/// One line of an assistant turn's code listing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CodeLine {
    /// 1-based line number.
    pub number: u32,
    /// The line's text without its line break. May be empty.
    pub content: String,
}

/// One entry in the conversation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Turn {
    /// A message the user submitted.
    User {
        /// The submitted text, untrimmed.
        content: String,
    },
    /// A generated code response.
    Assistant {
        /// Id keying this turn's reveal animation.
        id: TurnId,
        /// The full response text, exactly as the relay returned it.
        content: String,
        /// `content` split into numbered lines.
        code_lines: Vec<CodeLine>,
    },
    /// A failed generation. Error turns are never animated.
    Error {
        /// Id of this turn.
        id: TurnId,
        /// The error text presented to the user.
        content: String,
    },
}

impl Turn {
    /// Returns the full text of this turn.
    #[inline]
    pub fn content(&self) -> &str {
        match self {
            Turn::User { content }
            | Turn::Assistant { content, .. }
            | Turn::Error { content, .. } => content,
        }
    }

    /// Returns the turn's id, if it has one.
    #[inline]
    pub fn id(&self) -> Option<TurnId> {
        match self {
            Turn::User { .. } => None,
            Turn::Assistant { id, .. } | Turn::Error { id, .. } => Some(*id),
        }
    }

    /// Returns `true` for failure turns.
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Turn::Error { .. })
    }
}

/// Splits `content` into numbered code lines.
///
/// One entry per `'\n'`-separated segment, numbered from 1. Empty lines
/// are preserved as empty content, including a trailing one, so joining
/// the line contents with `'\n'` reproduces `content` exactly. An empty
/// `content` yields a single empty line.
pub fn split_code_lines(content: &str) -> Vec<CodeLine> {
    content
        .split('\n')
        .enumerate()
        .map(|(idx, line)| CodeLine {
            number: idx as u32 + 1,
            content: line.to_owned(),
        })
        .collect()
}

/// Represents a conversation.
///
/// The turn list is append-only; it only ever shrinks by being cleared
/// as a whole on reset.
#[derive(Clone, Default, Debug)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Returns the turns in chronological append order.
    #[inline]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the number of turns.
    #[inline]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns `true` if there are no turns.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Returns the total line count of the assistant turn with `id`.
    pub fn line_count(&self, id: TurnId) -> Option<usize> {
        self.turns.iter().find_map(|turn| match turn {
            Turn::Assistant {
                id: turn_id,
                code_lines,
                ..
            } if *turn_id == id => Some(code_lines.len()),
            _ => None,
        })
    }

    #[inline]
    pub(crate) fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejoin(lines: &[CodeLine]) -> String {
        lines
            .iter()
            .map(|line| line.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_split_numbers_from_one() {
        let lines = split_code_lines("a\nb\nc");
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines.iter().map(|l| l.number).collect::<Vec<_>>(),
            [1, 2, 3]
        );
    }

    #[test]
    fn test_split_round_trips() {
        for content in [
            "function reverse(s) {\n  return s.split('').reverse().join('');\n}",
            "single line",
            "",
            "\n",
            "trailing newline\n",
            "\n\nleading and inner\n\n",
        ] {
            assert_eq!(rejoin(&split_code_lines(content)), content);
        }
    }

    #[test]
    fn test_split_preserves_empty_lines() {
        let lines = split_code_lines("a\n\nb\n");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1].content, "");
        assert_eq!(lines[3].content, "");
    }

    #[test]
    fn test_split_empty_content_is_one_empty_line() {
        let lines = split_code_lines("");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].content, "");
    }

    #[test]
    fn test_turn_accessors() {
        let user = Turn::User {
            content: "hi".to_owned(),
        };
        assert_eq!(user.content(), "hi");
        assert_eq!(user.id(), None);
        assert!(!user.is_error());

        let error = Turn::Error {
            id: TurnId(3),
            content: "nope".to_owned(),
        };
        assert_eq!(error.content(), "nope");
        assert_eq!(error.id(), Some(TurnId(3)));
        assert!(error.is_error());
    }

    #[test]
    fn test_line_count() {
        let mut conversation = Conversation::default();
        conversation.push(Turn::User {
            content: "hi".to_owned(),
        });
        conversation.push(Turn::Assistant {
            id: TurnId(1),
            content: "a\nb".to_owned(),
            code_lines: split_code_lines("a\nb"),
        });
        conversation.push(Turn::Error {
            id: TurnId(2),
            content: "nope".to_owned(),
        });

        assert_eq!(conversation.line_count(TurnId(1)), Some(2));
        // Error turns have no code lines.
        assert_eq!(conversation.line_count(TurnId(2)), None);
        assert_eq!(conversation.line_count(TurnId(3)), None);
    }
}
