//! Color constants for the terminal calendar.

use ratatui::style::Color;

use crate::fields::Season;

// Month headers and the status bar take the colour of the month's season.

/// Used for spring months
pub const SPRING_GREEN: Color = Color::Rgb(0, 120, 60);
/// Used for summer months
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Used for autumn months
pub const RUST: Color = Color::Rgb(150, 60, 20);
/// Used for winter months
pub const FROST_BLUE: Color = Color::Rgb(40, 70, 130);

/// Theme colour of a season.
pub fn season_color(season: Season) -> Color {
    match season {
        Season::Spring => SPRING_GREEN,
        Season::Summer => GOLD,
        Season::Autumn => RUST,
        Season::Winter => FROST_BLUE,
    }
}

/// Readable text colour on top of a season colour.
pub fn text_on(color: Color) -> Color {
    match color {
        GOLD => Color::Rgb(20, 20, 20),
        _ => Color::White,
    }
}
