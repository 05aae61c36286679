//! Keybinding registry — maps actions to key events with config overrides.
//!
//! A data-driven registry instead of hardcoded match arms, so config.toml can
//! rebind any action by name.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    NavTop,
    NavBottom,
    ToggleExpand,
    ToggleFavorite,
    MoveFavoriteUp,
    MoveFavoriteDown,
    OpenInBrowser,
    Reload,
    CycleTheme,
    ShowHelp,
    Back,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit",
            Self::NavDown => "Navigate down",
            Self::NavUp => "Navigate up",
            Self::NavTop => "Jump to first forum",
            Self::NavBottom => "Jump to last forum",
            Self::ToggleExpand => "Expand / collapse subforums",
            Self::ToggleFavorite => "Pin / unpin favorite",
            Self::MoveFavoriteUp => "Move favorite up",
            Self::MoveFavoriteDown => "Move favorite down",
            Self::OpenInBrowser => "Open forum in browser",
            Self::Reload => "Reload forum list",
            Self::CycleTheme => "Cycle theme",
            Self::ShowHelp => "Show help",
            Self::Back => "Dismiss / back",
        }
    }

    /// Config key for overrides ([keybindings] section).
    fn config_name(self) -> &'static str {
        match self {
            Self::Quit => "quit",
            Self::NavDown => "nav_down",
            Self::NavUp => "nav_up",
            Self::NavTop => "nav_top",
            Self::NavBottom => "nav_bottom",
            Self::ToggleExpand => "toggle_expand",
            Self::ToggleFavorite => "toggle_favorite",
            Self::MoveFavoriteUp => "move_favorite_up",
            Self::MoveFavoriteDown => "move_favorite_down",
            Self::OpenInBrowser => "open_in_browser",
            Self::Reload => "reload",
            Self::CycleTheme => "cycle_theme",
            Self::ShowHelp => "show_help",
            Self::Back => "back",
        }
    }

    const ALL: [Action; 14] = [
        Action::Quit,
        Action::NavDown,
        Action::NavUp,
        Action::NavTop,
        Action::NavBottom,
        Action::ToggleExpand,
        Action::ToggleFavorite,
        Action::MoveFavoriteUp,
        Action::MoveFavoriteDown,
        Action::OpenInBrowser,
        Action::Reload,
        Action::CycleTheme,
        Action::ShowHelp,
        Action::Back,
    ];
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "/"
/// - Named keys: "Enter", "Esc", "Tab", "Up", "Down", "Space", "Backspace"
/// - Modifier combos: "Ctrl+d"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let rest = rest.trim();
        if rest.len() == 1 {
            return Some(KeySpec::ctrl(rest.chars().next()?));
        }
        return None;
    }

    match s.to_lowercase().as_str() {
        "enter" | "return" => return Some(KeySpec::plain(KeyCode::Enter)),
        "esc" | "escape" => return Some(KeySpec::plain(KeyCode::Esc)),
        "tab" => return Some(KeySpec::plain(KeyCode::Tab)),
        "up" => return Some(KeySpec::plain(KeyCode::Up)),
        "down" => return Some(KeySpec::plain(KeyCode::Down)),
        "left" => return Some(KeySpec::plain(KeyCode::Left)),
        "right" => return Some(KeySpec::plain(KeyCode::Right)),
        "backspace" => return Some(KeySpec::plain(KeyCode::Backspace)),
        "space" => return Some(KeySpec::plain(KeyCode::Char(' '))),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix(['F', 'f']) {
        if let Ok(n) = rest.parse::<u8>() {
            if (1..=12).contains(&n) {
                return Some(KeySpec::plain(KeyCode::F(n)));
            }
        }
    }

    if s.chars().count() == 1 {
        return Some(KeySpec::plain(KeyCode::Char(s.chars().next()?)));
    }

    None
}

/// Format a KeySpec as a human-readable string for the help screen.
pub fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// Lookup is O(1) via HashMap. An override replaces every default binding of
/// its action, then binds the new key.
pub struct KeybindingRegistry {
    lookup: HashMap<KeySpec, Action>,
    /// All bindings in registration order, for help screen enumeration.
    bindings: Vec<(KeySpec, Action)>,
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingRegistry {
    /// Create a registry with the default bindings.
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, key: KeySpec, action: Action) {
        self.lookup.insert(key, action);
        self.bindings.push((key, action));
    }

    fn register_defaults(&mut self) {
        self.bind(KeySpec::plain(KeyCode::Char('q')), Action::Quit);

        self.bind(KeySpec::plain(KeyCode::Char('j')), Action::NavDown);
        self.bind(KeySpec::plain(KeyCode::Down), Action::NavDown);
        self.bind(KeySpec::plain(KeyCode::Char('k')), Action::NavUp);
        self.bind(KeySpec::plain(KeyCode::Up), Action::NavUp);
        self.bind(KeySpec::plain(KeyCode::Char('g')), Action::NavTop);
        self.bind(KeySpec::plain(KeyCode::Char('G')), Action::NavBottom);

        self.bind(KeySpec::plain(KeyCode::Enter), Action::ToggleExpand);
        self.bind(KeySpec::plain(KeyCode::Char(' ')), Action::ToggleExpand);

        self.bind(KeySpec::plain(KeyCode::Char('f')), Action::ToggleFavorite);
        self.bind(KeySpec::plain(KeyCode::Char('K')), Action::MoveFavoriteUp);
        self.bind(KeySpec::plain(KeyCode::Char('J')), Action::MoveFavoriteDown);

        self.bind(KeySpec::plain(KeyCode::Char('o')), Action::OpenInBrowser);
        self.bind(KeySpec::plain(KeyCode::Char('r')), Action::Reload);
        self.bind(KeySpec::plain(KeyCode::Char('t')), Action::CycleTheme);
        self.bind(KeySpec::plain(KeyCode::Char('?')), Action::ShowHelp);
        self.bind(KeySpec::plain(KeyCode::Esc), Action::Back);
    }

    /// Apply config overrides. Unknown action names and unparseable key
    /// strings are logged and skipped; the default binding stays.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) {
        for (action_name, key_string) in overrides {
            let Some(action) = Action::ALL
                .iter()
                .copied()
                .find(|action| action.config_name() == action_name)
            else {
                tracing::warn!(action = %action_name, "unknown action in keybinding overrides");
                continue;
            };
            let Some(key) = parse_key_string(key_string) else {
                tracing::warn!(
                    action = %action_name,
                    key = %key_string,
                    "unparseable key in keybinding overrides"
                );
                continue;
            };

            // Drop every default binding of this action, then rebind.
            self.lookup.retain(|_, bound| *bound != action);
            self.bindings.retain(|(_, bound)| *bound != action);
            self.bind(key, action);
        }
    }

    /// Resolve a key event to an action.
    pub fn action_for(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
        // Shifted characters arrive with the SHIFT modifier set; the char
        // already encodes it, so strip SHIFT for lookup.
        let modifiers = modifiers.difference(KeyModifiers::SHIFT);
        self.lookup.get(&KeySpec::new(code, modifiers)).copied()
    }

    /// All bindings in registration order, for the help screen.
    pub fn bindings(&self) -> &[(KeySpec, Action)] {
        &self.bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_chars_and_named_keys() {
        assert_eq!(
            parse_key_string("j"),
            Some(KeySpec::plain(KeyCode::Char('j')))
        );
        assert_eq!(parse_key_string("Enter"), Some(KeySpec::plain(KeyCode::Enter)));
        assert_eq!(
            parse_key_string("Space"),
            Some(KeySpec::plain(KeyCode::Char(' ')))
        );
        assert_eq!(parse_key_string("Ctrl+d"), Some(KeySpec::ctrl('d')));
        assert_eq!(parse_key_string("F5"), Some(KeySpec::plain(KeyCode::F(5))));
        assert_eq!(parse_key_string("Hyper+x"), None);
        assert_eq!(parse_key_string("F13"), None);
    }

    #[test]
    fn default_bindings_resolve() {
        let registry = KeybindingRegistry::new();
        assert_eq!(
            registry.action_for(KeyCode::Char('q'), KeyModifiers::NONE),
            Some(Action::Quit)
        );
        assert_eq!(
            registry.action_for(KeyCode::Char('J'), KeyModifiers::SHIFT),
            Some(Action::MoveFavoriteDown)
        );
        assert_eq!(
            registry.action_for(KeyCode::Char('z'), KeyModifiers::NONE),
            None
        );
    }

    #[test]
    fn override_replaces_all_default_bindings() {
        let mut registry = KeybindingRegistry::new();
        let overrides =
            HashMap::from([("nav_down".to_string(), "Ctrl+n".to_string())]);
        registry.apply_overrides(&overrides);

        assert_eq!(
            registry.action_for(KeyCode::Char('n'), KeyModifiers::CONTROL),
            Some(Action::NavDown)
        );
        // Both defaults ('j' and Down) are gone.
        assert_eq!(
            registry.action_for(KeyCode::Char('j'), KeyModifiers::NONE),
            None
        );
        assert_eq!(registry.action_for(KeyCode::Down, KeyModifiers::NONE), None);
    }

    #[test]
    fn bad_overrides_keep_defaults() {
        let mut registry = KeybindingRegistry::new();
        let overrides = HashMap::from([
            ("warp_drive".to_string(), "w".to_string()),
            ("quit".to_string(), "NotAKey+".to_string()),
        ]);
        registry.apply_overrides(&overrides);

        assert_eq!(
            registry.action_for(KeyCode::Char('q'), KeyModifiers::NONE),
            Some(Action::Quit)
        );
    }
}
