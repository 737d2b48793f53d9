//! Story IR: the ordered staging instructions handed to a playback renderer.

mod plain_text;
mod sirius;

use std::fmt;
use std::str::FromStr;

pub use plain_text::to_plain_text;
pub use sirius::to_sirius;

/// Locale a story is written for.
///
/// The discriminant is the tag stored in the binary container.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[repr(u8)]
pub enum Locale {
    #[default]
    Jp = 0,
    En = 1,
    Tw = 2,
    Cn = 3,
    Kr = 4,
}

impl Locale {
    pub const ALL: [Locale; 5] = [Locale::Jp, Locale::En, Locale::Tw, Locale::Cn, Locale::Kr];

    pub const fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(usize::from(tag)).copied()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Locale::Jp => "jp",
            Locale::En => "en",
            Locale::Tw => "tw",
            Locale::Cn => "cn",
            Locale::Kr => "kr",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|locale| locale.as_str() == s)
            .copied()
            .ok_or(())
    }
}

/// Horizontal anchor slot for a character model.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "codec", derive(serde::Serialize, serde::Deserialize))]
pub enum PositionBase {
    LeftOutside,
    Left,
    LeftInside,
    LeftBottom,
    LeftInsideBottom,
    Center,
    RightOutside,
    Right,
    RightInside,
    RightBottom,
    RightInsideBottom,
}

impl PositionBase {
    pub const ALL: [PositionBase; 11] = [
        PositionBase::LeftOutside,
        PositionBase::Left,
        PositionBase::LeftInside,
        PositionBase::LeftBottom,
        PositionBase::LeftInsideBottom,
        PositionBase::Center,
        PositionBase::RightOutside,
        PositionBase::Right,
        PositionBase::RightInside,
        PositionBase::RightBottom,
        PositionBase::RightInsideBottom,
    ];

    /// Case name as written in scripts (`.leftInside`).
    pub const fn case_name(self) -> &'static str {
        match self {
            PositionBase::LeftOutside => "leftOutside",
            PositionBase::Left => "left",
            PositionBase::LeftInside => "leftInside",
            PositionBase::LeftBottom => "leftBottom",
            PositionBase::LeftInsideBottom => "leftInsideBottom",
            PositionBase::Center => "center",
            PositionBase::RightOutside => "rightOutside",
            PositionBase::Right => "right",
            PositionBase::RightInside => "rightInside",
            PositionBase::RightBottom => "rightBottom",
            PositionBase::RightInsideBottom => "rightInsideBottom",
        }
    }

    pub fn from_case_name(name: &str) -> Option<Self> {
        Self::ALL.iter().find(|b| b.case_name() == name).copied()
    }

    /// Ordinal in declaration order.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Model placement: an anchor slot plus a horizontal offset.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "codec", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub base: PositionBase,
    pub offset_x: f64,
}

impl Position {
    pub const fn at(base: PositionBase) -> Self {
        Position {
            base,
            offset_x: 0.0,
        }
    }
}

/// One staging instruction.
///
/// Not serializable itself: the container writes action trees in a flat
/// form so that reading one never recurses.
#[derive(Clone, PartialEq, Debug)]
pub enum StepAction {
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
    /// Actions the renderer runs to completion before continuing.
    Blocking(Vec<StepAction>),
    Delay {
        seconds: f64,
    },
    /// Actions the renderer runs concurrently with what follows.
    ForkTask(Vec<StepAction>),
    /// Join every forked task.
    WaitForAll,
}

impl StepAction {
    /// Number of actions including nested blocking/forked ones.
    pub fn deep_count(&self) -> usize {
        match self {
            StepAction::Blocking(actions) | StepAction::ForkTask(actions) => {
                1 + actions.iter().map(StepAction::deep_count).sum::<usize>()
            }
            _ => 1,
        }
    }
}

/// A compiled story: its locale and ordered actions.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct StoryIr {
    locale: Locale,
    actions: Vec<StepAction>,
}

impl StoryIr {
    pub fn new(locale: Locale) -> Self {
        StoryIr {
            locale,
            actions: Vec::new(),
        }
    }

    pub fn from_parts(locale: Locale, actions: Vec<StepAction>) -> Self {
        StoryIr { locale, actions }
    }

    /// Append an action.
    pub fn emit(&mut self, action: StepAction) {
        self.actions.push(action);
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn actions(&self) -> &[StepAction] {
        &self.actions
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Human-readable listing, see [`to_plain_text`].
    pub fn to_plain_text(&self) -> String {
        to_plain_text(self)
    }

    /// Indented outline, see [`to_sirius`].
    pub fn to_sirius(&self) -> String {
        to_sirius(self)
    }

    /// Number of actions including nested ones.
    pub fn deep_count(&self) -> usize {
        self.actions.iter().map(StepAction::deep_count).sum()
    }
}
