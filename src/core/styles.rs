//! Kiosk color roles
//!
//! Each logical role (cart header, total, notice...) maps to one
//! `colored::Color`. Painting takes an explicit `enabled` flag instead of
//! consulting global state, so output is predictable in tests and pipes.
//!
//! ```
//! use nexcart::core::styles::StyleRole;
//! assert_eq!(StyleRole::Total.paint("Total: $10.00", false), "Total: $10.00");
//! assert!(StyleRole::Total.paint("Total: $10.00", true).starts_with("\x1b["));
//! ```

use clap::builder::styling::AnsiColor;
use colored::Color;

macro_rules! style {
    ( $( $variant:ident => $color:expr ),+ $(,)? ) => {
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        pub enum StyleRole { $( $variant ),+ }

        impl StyleRole {
            pub fn color(self) -> Option<Color> {
                match self { $( StyleRole::$variant => $color ),+ }
            }
        }
    };
}

style! {
    Header         => Some(Color::Yellow),
    Price          => Some(Color::Cyan),
    Total          => Some(Color::BrightGreen),
    Mode           => Some(Color::Magenta),
    Notice         => Some(Color::BrightYellow),
    Recommendation => Some(Color::Blue),
    Error          => Some(Color::BrightRed),
    Dim            => Some(Color::BrightBlack),
    Value          => None,
}

impl StyleRole {
    pub fn ansi_code(self) -> Option<&'static str> {
        self.color().and_then(ansi_code)
    }

    pub fn paint(self, text: &str, enabled: bool) -> String {
        match self.ansi_code() {
            Some(code) if enabled => format!("\x1b[{}m{}\x1b[0m", code, text),
            _ => text.to_string(),
        }
    }

    /// prettytable cell style spec, e.g. "Fc" for cyan foreground
    pub fn table_spec(self, enabled: bool) -> &'static str {
        if !enabled {
            return "";
        }
        match self.color() {
            Some(Color::Yellow) => "Fy",
            Some(Color::Cyan) => "Fc",
            Some(Color::BrightGreen) => "FG",
            Some(Color::Magenta) => "Fm",
            Some(Color::BrightYellow) => "FY",
            Some(Color::Blue) => "Fb",
            Some(Color::BrightRed) => "FR",
            Some(Color::BrightBlack) => "FK",
            _ => "",
        }
    }
}

fn ansi_code(color: Color) -> Option<&'static str> {
    use Color::*;
    Some(match color {
        Yellow => "33",
        Cyan => "36",
        BrightGreen => "92",
        Magenta => "35",
        BrightYellow => "93",
        Blue => "34",
        BrightRed => "91",
        BrightBlack => "90",
        _ => return None,
    })
}

fn clap_color(color: Color) -> Option<AnsiColor> {
    use Color::*;
    Some(match color {
        Yellow => self::AnsiColor::Yellow,
        Cyan => self::AnsiColor::Cyan,
        BrightGreen => self::AnsiColor::BrightGreen,
        Magenta => self::AnsiColor::Magenta,
        BrightYellow => self::AnsiColor::BrightYellow,
        Blue => self::AnsiColor::Blue,
        BrightRed => self::AnsiColor::BrightRed,
        BrightBlack => self::AnsiColor::BrightBlack,
        _ => return None,
    })
}

/// clap help styles built from the same roles
pub fn palette_to_clap(enabled: bool) -> clap::builder::Styles {
    use clap::builder::styling::{Color as ClapColor, Style};
    if !enabled {
        return clap::builder::Styles::plain();
    }

    let style = |role: StyleRole, bold: bool| {
        let mut s = Style::new();
        if let Some(col) = role.color().and_then(clap_color) {
            s = s.fg_color(Some(ClapColor::Ansi(col)));
        }
        if bold {
            s = s.bold();
        }
        s
    };

    clap::builder::Styles::styled()
        .header(style(StyleRole::Header, true))
        .usage(style(StyleRole::Header, true))
        .literal(style(StyleRole::Price, false))
        .placeholder(style(StyleRole::Recommendation, false))
        .error(style(StyleRole::Error, true))
}
