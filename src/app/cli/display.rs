//! Terminal rendering of the kiosk: cart table, total, recommendations,
//! mode/scanning status and notifications.

use chrono::{DateTime, Local};
use prettytable::{format, Cell, Row, Table};
use tokio::sync::broadcast;

use crate::cart::{CartLine, Mode, RecommendationSet};
use crate::core::styles::StyleRole;
use crate::notifications::api::{EventReceiver, KioskEvent, KioskEventType};
use crate::session::{ScanningState, SessionSnapshot};

/// Two-decimal dollar amount, as shown on the kiosk
pub fn format_price(amount: f64) -> String {
    format!("${:.2}", amount)
}

pub fn cart_table(lines: &[CartLine], use_color: bool) -> Table {
    let header = StyleRole::Header.table_spec(use_color);
    let price = StyleRole::Price.table_spec(use_color);

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(vec![
        Cell::new("Product Name").style_spec(header),
        Cell::new("Price").style_spec(header),
        Cell::new("Quantity").style_spec(header),
    ]));
    for line in lines {
        table.add_row(Row::new(vec![
            Cell::new(&line.name),
            Cell::new(&format_price(line.price)).style_spec(price),
            Cell::new(&line.quantity.to_string()).style_spec("r"),
        ]));
    }
    table
}

pub fn render_total(total: f64, use_color: bool) -> String {
    StyleRole::Total.paint(&format!("Total: {}", format_price(total)), use_color)
}

/// "Recommended Products" block, or an empty string when there are none
pub fn render_recommendations(recommendations: &RecommendationSet, use_color: bool) -> String {
    if recommendations.is_empty() {
        return String::new();
    }

    let mut out = StyleRole::Header.paint("Recommended Products", use_color);
    out.push('\n');
    for entry in recommendations {
        out.push_str(&format!(
            "  {}\n    Floor: {}, Row: {}\n    Available Brands: {}\n",
            StyleRole::Recommendation.paint(&entry.name, use_color),
            entry.floor,
            entry.row,
            entry.brands.join(", ")
        ));
    }
    out
}

pub fn render_status(mode: Mode, scanning: ScanningState, use_color: bool) -> String {
    let scanning = match scanning {
        ScanningState::Active => "scanning",
        ScanningState::Idle => "idle",
    };
    format!(
        "[{}] {}",
        StyleRole::Mode.paint(mode.label(), use_color),
        StyleRole::Dim.paint(scanning, use_color)
    )
}

pub fn render_notice(at: DateTime<Local>, message: &str, use_color: bool) -> String {
    format!(
        "{} >> {}",
        StyleRole::Dim.paint(&at.format("%H:%M:%S").to_string(), use_color),
        StyleRole::Notice.paint(message, use_color)
    )
}

/// Last known kiosk state, rebuilt from events
#[derive(Debug, Clone, Default)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub total: f64,
    pub mode: Mode,
    pub scanning: ScanningState,
    pub recommendations: RecommendationSet,
    pub notification: Option<String>,
    pub notification_shown_at: Option<DateTime<Local>>,
}

/// What part of the screen an event invalidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    Nothing,
    Cart,
    Status,
    Notice,
    Stop,
}

impl CartView {
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        Self {
            lines: snapshot.lines.clone(),
            total: snapshot.total,
            mode: snapshot.mode,
            scanning: snapshot.scanning,
            recommendations: snapshot.recommendations.clone(),
            notification: snapshot.notification.clone(),
            notification_shown_at: None,
        }
    }

    pub fn apply(&mut self, event: &KioskEvent) -> Redraw {
        match &event.event_type {
            KioskEventType::CartChanged(snapshot) => {
                self.lines = snapshot.lines.clone();
                self.total = snapshot.total;
                Redraw::Cart
            }
            KioskEventType::RecommendationsChanged(set) => {
                if self.recommendations == *set {
                    return Redraw::Nothing;
                }
                self.recommendations = set.clone();
                Redraw::Cart
            }
            KioskEventType::ModeChanged(mode) => {
                self.mode = *mode;
                Redraw::Status
            }
            KioskEventType::ScanningChanged(state) => {
                self.scanning = *state;
                Redraw::Status
            }
            KioskEventType::NotificationShown { message, .. } => {
                self.notification = Some(message.clone());
                self.notification_shown_at = Some(event.timestamp);
                Redraw::Notice
            }
            KioskEventType::NotificationCleared { .. } => {
                self.notification = None;
                self.notification_shown_at = None;
                Redraw::Nothing
            }
            KioskEventType::Shutdown => Redraw::Stop,
        }
    }

    /// Full cart screen: table (or empty marker), total, recommendations
    pub fn render_cart(&self, use_color: bool) -> String {
        let mut out = StyleRole::Header.paint("Cart", use_color);
        out.push('\n');
        if self.lines.is_empty() {
            out.push_str("  (empty)\n");
        } else {
            out.push_str(&cart_table(&self.lines, use_color).to_string());
        }
        out.push_str(&render_total(self.total, use_color));
        out.push('\n');
        out.push_str(&render_recommendations(&self.recommendations, use_color));
        out
    }

    pub fn print(&self, redraw: Redraw, use_color: bool) {
        match redraw {
            Redraw::Cart => print!("{}", self.render_cart(use_color)),
            Redraw::Status => println!("{}", render_status(self.mode, self.scanning, use_color)),
            Redraw::Notice => {
                if let Some(message) = &self.notification {
                    let at = self.notification_shown_at.unwrap_or_else(Local::now);
                    println!("{}", render_notice(at, message, use_color));
                }
            }
            Redraw::Nothing | Redraw::Stop => {}
        }
    }
}

/// Print kiosk events until shutdown or until the controller goes away
pub async fn run_display(
    mut events: EventReceiver,
    mut shutdown_rx: broadcast::Receiver<()>,
    initial: SessionSnapshot,
    use_color: bool,
) {
    let mut view = CartView::from_snapshot(&initial);
    view.print(Redraw::Status, use_color);

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            event = events.recv() => {
                let Some(event) = event else { break };
                log::trace!("Display received {}", event.kind());
                let redraw = view.apply(&event);
                if redraw == Redraw::Stop {
                    break;
                }
                view.print(redraw, use_color);
            }
        }
    }
    log::debug!("Display stopped");
}
