//! Flag-like CSP directives: `sandbox`, `require-sri-for` and `reflected-xss`

use std::fmt;

/// Normalises a token for enum matching: hyphens removed, lowercase
fn normalize(token: &str) -> String {
    token
        .chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Allowances of the `sandbox` directive
///
/// An empty set is meaningful: it renders as the bare `sandbox` directive,
/// which applies every restriction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SandboxRules(u16);

impl SandboxRules {
    pub const ALLOW_FORMS: Self = Self(1);
    pub const ALLOW_SAME_ORIGIN: Self = Self(1 << 1);
    pub const ALLOW_SCRIPTS: Self = Self(1 << 2);
    pub const ALLOW_POPUPS: Self = Self(1 << 3);
    pub const ALLOW_MODALS: Self = Self(1 << 4);
    pub const ALLOW_ORIENTATION_LOCK: Self = Self(1 << 5);
    pub const ALLOW_POINTER_LOCK: Self = Self(1 << 6);
    pub const ALLOW_PRESENTATION: Self = Self(1 << 7);
    pub const ALLOW_POPUPS_TO_ESCAPE_SANDBOX: Self = Self(1 << 8);
    pub const ALLOW_TOP_NAVIGATION: Self = Self(1 << 9);

    const TOKENS: [(Self, &'static str); 10] = [
        (Self::ALLOW_FORMS, "allow-forms"),
        (Self::ALLOW_SAME_ORIGIN, "allow-same-origin"),
        (Self::ALLOW_SCRIPTS, "allow-scripts"),
        (Self::ALLOW_POPUPS, "allow-popups"),
        (Self::ALLOW_MODALS, "allow-modals"),
        (Self::ALLOW_ORIENTATION_LOCK, "allow-orientation-lock"),
        (Self::ALLOW_POINTER_LOCK, "allow-pointer-lock"),
        (Self::ALLOW_PRESENTATION, "allow-presentation"),
        (Self::ALLOW_POPUPS_TO_ESCAPE_SANDBOX, "allow-popups-to-escape-sandbox"),
        (Self::ALLOW_TOP_NAVIGATION, "allow-top-navigation"),
    ];

    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Matches one token such as `allow-forms` or `AllowForms`
    pub fn from_token(token: &str) -> Option<Self> {
        let wanted = normalize(token);
        Self::TOKENS
            .iter()
            .find(|(_, name)| normalize(name) == wanted)
            .map(|(flag, _)| *flag)
    }

    /// All tokens must be recognised, otherwise the whole value is `None`
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Option<Self> {
        tokens.iter().try_fold(Self::empty(), |acc, token| {
            Self::from_token(token.as_ref()).map(|flag| acc.union(flag))
        })
    }

    pub fn tokens(self) -> impl Iterator<Item = &'static str> {
        Self::TOKENS
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }
}

impl std::ops::BitOr for SandboxRules {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl fmt::Display for SandboxRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens().collect::<Vec<_>>().join(" "))
    }
}

/// Resource kinds listed in `require-sri-for`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RequireSriFor {
    pub style: bool,
    pub script: bool,
}

impl RequireSriFor {
    pub const STYLE: Self = Self {
        style: true,
        script: false,
    };
    pub const SCRIPT: Self = Self {
        style: false,
        script: true,
    };
    pub const ALL: Self = Self {
        style: true,
        script: true,
    };

    pub fn is_empty(self) -> bool {
        !self.style && !self.script
    }

    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Option<Self> {
        if tokens.is_empty() {
            return None;
        }
        let mut value = Self::default();
        for token in tokens {
            match normalize(token.as_ref()).as_str() {
                "style" => value.style = true,
                "script" => value.script = true,
                _ => return None,
            }
        }
        Some(value)
    }
}

impl fmt::Display for RequireSriFor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.style, self.script) {
            (true, true) => f.write_str("style script"),
            (true, false) => f.write_str("style"),
            (false, true) => f.write_str("script"),
            (false, false) => Ok(()),
        }
    }
}

/// `reflected-xss` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectedXss {
    Allow,
    Block,
}

impl ReflectedXss {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Block => "block",
        }
    }

    /// Exactly one recognised token, anything else is `None`
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Option<Self> {
        match tokens {
            [token] => match normalize(token.as_ref()).as_str() {
                "allow" => Some(Self::Allow),
                "block" => Some(Self::Block),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for ReflectedXss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
