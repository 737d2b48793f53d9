//! Flat on-disk form of an action tree.
//!
//! Actions are written in pre-order. A `Blocking` or `ForkTask` entry
//! carries the number of direct children that follow it, so neither
//! writing nor reading a tree recurses and a hostile payload cannot nest
//! deeper than [`MAX_NESTING`].

use serde::{Deserialize, Serialize};
use zeile_ir::{Position, StepAction};

use crate::CodecError;

/// Deepest `Blocking`/`ForkTask` nesting a container may hold.
pub const MAX_NESTING: usize = 256;

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub(crate) enum WireAction {
    Talk {
        text: String,
        character_ids: Vec<i64>,
        character_names: Vec<String>,
        voice_path: Option<String>,
    },
    Telop {
        text: String,
    },
    ShowModel {
        character_id: i64,
        model_path: String,
        position: Position,
    },
    HideModel {
        character_id: i64,
    },
    MoveModel {
        character_id: i64,
        position: Position,
    },
    Act {
        character_id: i64,
        motion_name: String,
    },
    Express {
        character_id: i64,
        expression_name: String,
    },
    ShowBlackCover {
        duration: f64,
    },
    HideBlackCover {
        duration: f64,
    },
    ShowWhiteCover {
        duration: f64,
    },
    HideWhiteCover {
        duration: f64,
    },
    ChangeBackground {
        path: String,
    },
    ChangeBgm {
        path: String,
    },
    ChangeSe {
        path: String,
    },
    Blocking {
        children: usize,
    },
    Delay {
        seconds: f64,
    },
    ForkTask {
        children: usize,
    },
    WaitForAll,
}

#[derive(Copy, Clone, Debug)]
enum ListKind {
    Blocking,
    ForkTask,
}

impl ListKind {
    fn wrap(self, actions: Vec<StepAction>) -> StepAction {
        match self {
            ListKind::Blocking => StepAction::Blocking(actions),
            ListKind::ForkTask => StepAction::ForkTask(actions),
        }
    }
}

enum Node {
    Leaf(StepAction),
    List(ListKind, usize),
}

/// Flatten `actions` in pre-order.
pub(crate) fn flatten(actions: &[StepAction]) -> Result<Vec<WireAction>, CodecError> {
    let mut wire = Vec::with_capacity(actions.len());
    let mut pending = vec![actions.iter()];
    while let Some(top) = pending.last_mut() {
        let Some(action) = top.next() else {
            pending.pop();
            continue;
        };
        wire.push(to_wire(action));
        if let StepAction::Blocking(children) | StepAction::ForkTask(children) = action {
            if pending.len() > MAX_NESTING {
                return Err(CodecError::NestingTooDeep { limit: MAX_NESTING });
            }
            pending.push(children.iter());
        }
    }
    Ok(wire)
}

struct OpenList {
    kind: ListKind,
    remaining: usize,
    actions: Vec<StepAction>,
}

/// Rebuild the tree written by [`flatten`].
pub(crate) fn unflatten(wire: Vec<WireAction>) -> Result<Vec<StepAction>, CodecError> {
    let mut root = Vec::new();
    let mut open: Vec<OpenList> = Vec::new();
    for entry in wire {
        let action = match from_wire(entry) {
            Node::Leaf(action) => action,
            Node::List(kind, children) => {
                if open.len() >= MAX_NESTING {
                    return Err(CodecError::NestingTooDeep { limit: MAX_NESTING });
                }
                if children == 0 {
                    kind.wrap(Vec::new())
                } else {
                    open.push(OpenList {
                        kind,
                        remaining: children,
                        // The count is untrusted until the children arrive.
                        actions: Vec::with_capacity(children.min(64)),
                    });
                    continue;
                }
            }
        };
        attach(&mut root, &mut open, action);
    }
    if !open.is_empty() {
        return Err(CodecError::UnterminatedList);
    }
    Ok(root)
}

/// Append `action` to the innermost open list, closing every list that
/// becomes complete.
fn attach(root: &mut Vec<StepAction>, open: &mut Vec<OpenList>, mut action: StepAction) {
    loop {
        let Some(list) = open.last_mut() else {
            root.push(action);
            return;
        };
        list.actions.push(action);
        list.remaining -= 1;
        if list.remaining > 0 {
            return;
        }
        let Some(done) = open.pop() else {
            return;
        };
        action = done.kind.wrap(done.actions);
    }
}

fn to_wire(action: &StepAction) -> WireAction {
    match action {
        StepAction::Talk {
            text,
            character_ids,
            character_names,
            voice_path,
        } => WireAction::Talk {
            text: text.clone(),
            character_ids: character_ids.clone(),
            character_names: character_names.clone(),
            voice_path: voice_path.clone(),
        },
        StepAction::Telop { text } => WireAction::Telop { text: text.clone() },
        StepAction::ShowModel {
            character_id,
            model_path,
            position,
        } => WireAction::ShowModel {
            character_id: *character_id,
            model_path: model_path.clone(),
            position: *position,
        },
        StepAction::HideModel { character_id } => WireAction::HideModel {
            character_id: *character_id,
        },
        StepAction::MoveModel {
            character_id,
            position,
        } => WireAction::MoveModel {
            character_id: *character_id,
            position: *position,
        },
        StepAction::Act {
            character_id,
            motion_name,
        } => WireAction::Act {
            character_id: *character_id,
            motion_name: motion_name.clone(),
        },
        StepAction::Express {
            character_id,
            expression_name,
        } => WireAction::Express {
            character_id: *character_id,
            expression_name: expression_name.clone(),
        },
        StepAction::ShowBlackCover { duration } => WireAction::ShowBlackCover {
            duration: *duration,
        },
        StepAction::HideBlackCover { duration } => WireAction::HideBlackCover {
            duration: *duration,
        },
        StepAction::ShowWhiteCover { duration } => WireAction::ShowWhiteCover {
            duration: *duration,
        },
        StepAction::HideWhiteCover { duration } => WireAction::HideWhiteCover {
            duration: *duration,
        },
        StepAction::ChangeBackground { path } => WireAction::ChangeBackground { path: path.clone() },
        StepAction::ChangeBgm { path } => WireAction::ChangeBgm { path: path.clone() },
        StepAction::ChangeSe { path } => WireAction::ChangeSe { path: path.clone() },
        StepAction::Blocking(children) => WireAction::Blocking {
            children: children.len(),
        },
        StepAction::Delay { seconds } => WireAction::Delay { seconds: *seconds },
        StepAction::ForkTask(children) => WireAction::ForkTask {
            children: children.len(),
        },
        StepAction::WaitForAll => WireAction::WaitForAll,
    }
}

fn from_wire(entry: WireAction) -> Node {
    let action = match entry {
        WireAction::Talk {
            text,
            character_ids,
            character_names,
            voice_path,
        } => StepAction::Talk {
            text,
            character_ids,
            character_names,
            voice_path,
        },
        WireAction::Telop { text } => StepAction::Telop { text },
        WireAction::ShowModel {
            character_id,
            model_path,
            position,
        } => StepAction::ShowModel {
            character_id,
            model_path,
            position,
        },
        WireAction::HideModel { character_id } => StepAction::HideModel { character_id },
        WireAction::MoveModel {
            character_id,
            position,
        } => StepAction::MoveModel {
            character_id,
            position,
        },
        WireAction::Act {
            character_id,
            motion_name,
        } => StepAction::Act {
            character_id,
            motion_name,
        },
        WireAction::Express {
            character_id,
            expression_name,
        } => StepAction::Express {
            character_id,
            expression_name,
        },
        WireAction::ShowBlackCover { duration } => StepAction::ShowBlackCover { duration },
        WireAction::HideBlackCover { duration } => StepAction::HideBlackCover { duration },
        WireAction::ShowWhiteCover { duration } => StepAction::ShowWhiteCover { duration },
        WireAction::HideWhiteCover { duration } => StepAction::HideWhiteCover { duration },
        WireAction::ChangeBackground { path } => StepAction::ChangeBackground { path },
        WireAction::ChangeBgm { path } => StepAction::ChangeBgm { path },
        WireAction::ChangeSe { path } => StepAction::ChangeSe { path },
        WireAction::Blocking { children } => return Node::List(ListKind::Blocking, children),
        WireAction::Delay { seconds } => StepAction::Delay { seconds },
        WireAction::ForkTask { children } => return Node::List(ListKind::ForkTask, children),
        WireAction::WaitForAll => StepAction::WaitForAll,
    };
    Node::Leaf(action)
}
