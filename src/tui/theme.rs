use ratatui::style::Color;
use ratatui::widgets::block::BorderType;

// Panel colors
pub const FOCUSED: Color = Color::Green;
pub const SELECTED_BG: Color = Color::DarkGray;

// Border style
pub const BORDER_TYPE: BorderType = BorderType::Rounded;

// Card status colors
pub const MASTER: Color = Color::Cyan;
pub const COMPARING: Color = Color::Green;
pub const REVIEWED: Color = Color::Blue;

// Field highlight colors
pub const MISMATCH: Color = Color::Yellow;
pub const EDITED: Color = Color::Blue;
