use std::fmt;
use std::str::FromStr;

use crate::ParseError;

/// One flag of the capability set a user holds over a scope.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Capability {
    View,
    Add,
    Edit,
    Delete,
    Print,
    Confidential,
}

impl Capability {
    pub const ALL: [Capability; 6] = [
        Capability::View,
        Capability::Add,
        Capability::Edit,
        Capability::Delete,
        Capability::Print,
        Capability::Confidential,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::View => "view",
            Capability::Add => "add",
            Capability::Edit => "edit",
            Capability::Delete => "delete",
            Capability::Print => "print",
            Capability::Confidential => "confidential",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = ParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|cap| cap.as_str().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| ParseError::Capability(raw.to_string()))
    }
}

/// Capability flags held over one (department, sub-department) scope.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(default))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Capabilities {
    pub view: bool,
    pub add: bool,
    pub edit: bool,
    pub delete: bool,
    pub print: bool,
    pub confidential: bool,
}

impl Capabilities {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn full() -> Self {
        Self {
            view: true,
            add: true,
            edit: true,
            delete: true,
            print: true,
            confidential: true,
        }
    }

    pub fn from_list(caps: &[Capability]) -> Self {
        let mut set = Self::none();
        for cap in caps {
            set.set(*cap, true);
        }
        set
    }

    pub fn with(mut self, cap: Capability) -> Self {
        self.set(cap, true);
        self
    }

    pub fn set(&mut self, cap: Capability, value: bool) {
        match cap {
            Capability::View => self.view = value,
            Capability::Add => self.add = value,
            Capability::Edit => self.edit = value,
            Capability::Delete => self.delete = value,
            Capability::Print => self.print = value,
            Capability::Confidential => self.confidential = value,
        }
    }

    /// Raw flag as stored; see [`Capabilities::grants`] for the normalized answer.
    pub fn flag(&self, cap: Capability) -> bool {
        match cap {
            Capability::View => self.view,
            Capability::Add => self.add,
            Capability::Edit => self.edit,
            Capability::Delete => self.delete,
            Capability::Print => self.print,
            Capability::Confidential => self.confidential,
        }
    }

    /// True when any flag other than View is set.
    pub fn any_beyond_view(&self) -> bool {
        self.add || self.edit || self.delete || self.print || self.confidential
    }

    /// A non-View capability without View breaks the implicit-view rule.
    pub fn requires_normalization(&self) -> bool {
        !self.view && self.any_beyond_view()
    }

    /// Copy with View forced on whenever another capability is granted.
    pub fn normalized(mut self) -> Self {
        if self.any_beyond_view() {
            self.view = true;
        }
        self
    }

    /// Whether the capability is granted once the implicit-view rule is applied.
    pub fn grants(&self, cap: Capability) -> bool {
        self.normalized().flag(cap)
    }

    pub fn granted(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|cap| self.flag(*cap))
            .collect()
    }
}

/// Operation a caller wants to perform on a document.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    View,
    Add,
    Edit,
    Delete,
    Print,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::View,
        Action::Add,
        Action::Edit,
        Action::Delete,
        Action::Print,
    ];

    pub fn capability(&self) -> Capability {
        match self {
            Action::View => Capability::View,
            Action::Add => Capability::Add,
            Action::Edit => Capability::Edit,
            Action::Delete => Capability::Delete,
            Action::Print => Capability::Print,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.capability().as_str()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| ParseError::Action(raw.to_string()))
    }
}
