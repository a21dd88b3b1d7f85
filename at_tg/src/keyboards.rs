use teloxide::types::InlineKeyboardButton;
use teloxide::types::InlineKeyboardMarkup;

/// Inline button actions, carried as callback data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Status,
    Start,
    Stop,
    Settings,
    MainMenu,
    EditRsi,
    EditStoploss,
}

impl MenuAction {
    pub const ALL: [MenuAction; 7] = [
        MenuAction::Status,
        MenuAction::Start,
        MenuAction::Stop,
        MenuAction::Settings,
        MenuAction::MainMenu,
        MenuAction::EditRsi,
        MenuAction::EditStoploss,
    ];

    pub const fn callback_data(self) -> &'static str {
        match self {
            MenuAction::Status => "cb_status",
            MenuAction::Start => "cb_start",
            MenuAction::Stop => "cb_stop",
            MenuAction::Settings => "cb_settings",
            MenuAction::MainMenu => "cb_main_menu",
            MenuAction::EditRsi => "set_rsi",
            MenuAction::EditStoploss => "set_stoploss",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            MenuAction::Status => "📊 Status",
            MenuAction::Start => "▶️ Start",
            MenuAction::Stop => "⏹ Stop",
            MenuAction::Settings => "⚙️ Settings",
            MenuAction::MainMenu => "⬅️ Back",
            MenuAction::EditRsi => "✏️ Edit RSI",
            MenuAction::EditStoploss => "✏️ Edit Stoploss",
        }
    }

    pub fn parse(data: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.callback_data() == data)
    }

    fn button(self) -> InlineKeyboardButton {
        InlineKeyboardButton::callback(self.label(), self.callback_data())
    }
}

pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![MenuAction::Status.button()],
        vec![MenuAction::Start.button(), MenuAction::Stop.button()],
        vec![MenuAction::Settings.button()],
    ])
}

pub fn settings_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![MenuAction::EditRsi.button(), MenuAction::EditStoploss.button()],
        vec![MenuAction::MainMenu.button()],
    ])
}
