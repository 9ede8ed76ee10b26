//! Line-oriented state-diagram text.
//!
//! ```text
//! stateDiagram-v2
//!     [*] --> New
//!     note right of New
//!         Ticket newly created
//!     end note
//!     New --> Triage: assigned && prioritized
//!     Triage --> Closed
//!     Closed --> [*]
//! ```
//!
//! Each line is trimmed and matched against the rules below in order; the
//! first match wins and anything unmatched is ignored:
//!
//! 1. blank lines and the diagram header are skipped;
//! 2. `state "Name" ...` declares a state;
//! 3. `note ... of Name` opens a note attached to `Name`;
//! 4. `end note` closes an attached note and makes it the state's
//!    description; a note with no target stays open until the next `note`;
//! 5. any other line inside an open note is collected verbatim;
//! 6. `From --> To: label` adds a transition whose label is split on `&&`
//!    into `condition equals <fragment>` conditions. `[*]` on the left marks
//!    the right side initial, `[*]` on the right marks the left side terminal.
//!
//! The notation has no action vocabulary, and only conditions on the
//! `condition` field can be written back into a label.

use super::{WorkflowContent, WorkflowFormat, WorkflowParser};
use crate::core::error::{Result, WorkflowError};
use crate::core::workflow::schema::{Condition, Transition, UnifiedWorkflow, WorkflowState};
use serde_json::Value;

const HEADER_KEYWORD: &str = "stateDiagram";
const HEADER_LINE: &str = "stateDiagram-v2";
const STATE_KEYWORD: &str = "state";
const NOTE_KEYWORD: &str = "note";
const NOTE_TARGET_KEYWORD: &str = "of";
const NOTE_END: &str = "end note";
const ARROW: &str = "-->";
const SENTINEL: &str = "[*]";
const LABEL_SEPARATOR: char = ':';
const CONDITION_SEPARATOR: &str = "&&";
const INDENT: &str = "    ";

/// Field name given to every condition read from a transition label.
pub const CONDITION_FIELD: &str = "condition";
/// Operator given to every condition read from a transition label.
pub const CONDITION_OPERATOR: &str = "equals";

/// Parser for the state-diagram text notation.
#[derive(Debug, Clone, Copy, Default)]
pub struct MermaidParser;

impl MermaidParser {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Initial,
    Terminal,
}

struct NoteBlock {
    target: Option<String>,
    lines: Vec<String>,
}

/// Mutable state of a single parse call.
struct DiagramBuilder {
    workflow: UnifiedWorkflow,
    note: Option<NoteBlock>,
    pending_markers: Vec<(Marker, String)>,
    pending_notes: Vec<(String, String)>,
}

impl DiagramBuilder {
    fn new(source: &str) -> Self {
        Self {
            workflow: UnifiedWorkflow::new(source),
            note: None,
            pending_markers: Vec::new(),
            pending_notes: Vec::new(),
        }
    }

    fn feed(&mut self, line_number: usize, raw: &str) -> Result<()> {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(HEADER_KEYWORD) {
            return Ok(());
        }

        if line.starts_with(STATE_KEYWORD) {
            if let Some(name) = quoted_name(line) {
                self.ensure_state(name);
                return Ok(());
            }
        }

        if line.starts_with(NOTE_KEYWORD) {
            self.open_note(line);
        } else if line == NOTE_END && self.note_has_target() {
            self.close_note();
        } else if let Some(note) = self.note.as_mut() {
            note.lines.push(line.to_string());
        } else if line.contains(ARROW) {
            self.arrow_line(line_number, line)?;
        }
        Ok(())
    }

    fn ensure_state(&mut self, name: &str) {
        if !self.workflow.states.contains_key(name) {
            self.workflow.add_state(WorkflowState::new(name));
        }
    }

    fn open_note(&mut self, line: &str) {
        let target = line
            .find(NOTE_TARGET_KEYWORD)
            .map(|index| line[index + NOTE_TARGET_KEYWORD.len()..].trim())
            .filter(|target| !target.is_empty())
            .map(str::to_string);
        self.note = Some(NoteBlock {
            target,
            lines: Vec::new(),
        });
    }

    fn note_has_target(&self) -> bool {
        self.note.as_ref().is_some_and(|note| note.target.is_some())
    }

    fn close_note(&mut self) {
        let Some(NoteBlock {
            target: Some(target),
            lines,
        }) = self.note.take()
        else {
            return;
        };
        let description = lines.join("\n");
        match self.workflow.states.get_mut(&target) {
            Some(state) => state.description = Some(description),
            None => self.pending_notes.push((target, description)),
        }
    }

    fn arrow_line(&mut self, line_number: usize, line: &str) -> Result<()> {
        let (from_state, to_state, fragments) = split_transition_line(line_number, line)?;

        if from_state == SENTINEL {
            self.mark(Marker::Initial, to_state);
            return Ok(());
        }
        if to_state == SENTINEL {
            self.mark(Marker::Terminal, from_state);
            return Ok(());
        }

        self.ensure_state(from_state);
        self.ensure_state(to_state);

        let mut transition = Transition::new(from_state, to_state);
        transition.conditions = fragments
            .into_iter()
            .map(|fragment| {
                Condition::new(
                    CONDITION_FIELD,
                    CONDITION_OPERATOR,
                    Value::String(fragment.to_string()),
                )
            })
            .collect();
        self.workflow.add_transition(transition);
        Ok(())
    }

    fn mark(&mut self, marker: Marker, name: &str) {
        match self.workflow.states.get_mut(name) {
            Some(state) => apply_marker(state, marker),
            None => self.pending_markers.push((marker, name.to_string())),
        }
    }

    /// Resolve markers and notes that named a state before it was created.
    fn finish(mut self) -> UnifiedWorkflow {
        for (marker, name) in self.pending_markers.drain(..) {
            match self.workflow.states.get_mut(&name) {
                Some(state) => apply_marker(state, marker),
                None => tracing::warn!(
                    state = %name,
                    marker = ?marker,
                    "dropping diagram marker for a state that is never declared"
                ),
            }
        }
        for (name, description) in self.pending_notes.drain(..) {
            match self.workflow.states.get_mut(&name) {
                Some(state) => state.description = Some(description),
                None => tracing::warn!(
                    state = %name,
                    "dropping note for a state that is never declared"
                ),
            }
        }
        self.workflow
    }
}

fn apply_marker(state: &mut WorkflowState, marker: Marker) {
    match marker {
        Marker::Initial => state.is_initial = true,
        Marker::Terminal => state.is_terminal = true,
    }
}

/// First double-quoted substring of a line, if the quote is closed.
fn quoted_name(line: &str) -> Option<&str> {
    let mut parts = line.split('"');
    parts.next()?;
    let name = parts.next()?;
    parts.next()?;
    Some(name)
}

/// Split `From --> To: a && b` into its endpoints and label fragments.
fn split_transition_line(line_number: usize, line: &str) -> Result<(&str, &str, Vec<&str>)> {
    let parts: Vec<&str> = line.split(ARROW).collect();
    if parts.len() != 2 {
        return Err(WorkflowError::parse(format!(
            "Invalid transition line {}: {}",
            line_number, line
        )));
    }

    let from_state = parts[0].trim();
    let (to_state, label) = match parts[1].split_once(LABEL_SEPARATOR) {
        Some((to_state, label)) => (to_state.trim(), Some(label.trim())),
        None => (parts[1].trim(), None),
    };
    if from_state.is_empty() || to_state.is_empty() {
        return Err(WorkflowError::parse(format!(
            "Invalid transition line {}: missing state name in '{}'",
            line_number, line
        )));
    }

    let fragments = label
        .map(|label| {
            label
                .split(CONDITION_SEPARATOR)
                .map(str::trim)
                .collect()
        })
        .unwrap_or_default();
    Ok((from_state, to_state, fragments))
}

fn label_fragment(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Labels carry condition values only, so field and operator are not written;
/// re-parsing restores them as `condition`/`equals`.
fn transition_label(transition: &Transition) -> Option<String> {
    let fragments: Vec<String> = transition
        .conditions
        .iter()
        .filter(|condition| condition.field == CONDITION_FIELD)
        .map(|condition| label_fragment(&condition.value))
        .collect();
    if fragments.len() < transition.conditions.len() {
        tracing::debug!(
            from = %transition.from_state,
            to = %transition.to_state,
            dropped = transition.conditions.len() - fragments.len(),
            "conditions outside the label vocabulary are not written to the diagram"
        );
    }
    if fragments.is_empty() {
        return None;
    }
    Some(fragments.join(&format!(" {} ", CONDITION_SEPARATOR)))
}

impl WorkflowParser for MermaidParser {
    fn format(&self) -> WorkflowFormat {
        WorkflowFormat::Mermaid
    }

    fn parse(&self, content: &WorkflowContent) -> Result<UnifiedWorkflow> {
        let text = content.as_text().ok_or_else(|| {
            WorkflowError::parse("Error parsing Mermaid diagram: expected text content")
        })?;

        let mut builder = DiagramBuilder::new(self.format().as_str());
        for (index, line) in text.lines().enumerate() {
            builder.feed(index + 1, line)?;
        }
        let workflow = builder.finish();

        tracing::debug!(
            format = %self.format(),
            states = workflow.states.len(),
            transitions = workflow.transitions.len(),
            "parsed workflow"
        );
        Ok(workflow)
    }

    fn serialize(&self, workflow: &UnifiedWorkflow) -> Result<WorkflowContent> {
        let mut lines = vec![HEADER_LINE.to_string()];

        for state in workflow.initial_states() {
            lines.push(format!("{INDENT}{SENTINEL} {ARROW} {}", state.name));
        }

        for state in workflow.states.values() {
            let Some(description) = state.description.as_deref().filter(|d| !d.is_empty()) else {
                continue;
            };
            lines.push(format!("{INDENT}{NOTE_KEYWORD} right of {}", state.name));
            for note_line in description.lines() {
                lines.push(format!("{INDENT}{INDENT}{}", note_line));
            }
            lines.push(format!("{INDENT}{NOTE_END}"));
        }

        for transition in &workflow.transitions {
            let mut line = format!(
                "{INDENT}{} {ARROW} {}",
                transition.from_state, transition.to_state
            );
            if let Some(label) = transition_label(transition) {
                line.push(LABEL_SEPARATOR);
                if !label.is_empty() {
                    line.push(' ');
                    line.push_str(&label);
                }
            }
            lines.push(line);
        }

        for state in workflow.terminal_states() {
            lines.push(format!("{INDENT}{} {ARROW} {SENTINEL}", state.name));
        }

        tracing::debug!(
            format = %self.format(),
            states = workflow.states.len(),
            transitions = workflow.transitions.len(),
            "serialized workflow"
        );
        Ok(WorkflowContent::Text(lines.join("\n")))
    }
}
