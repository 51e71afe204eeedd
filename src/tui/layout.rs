use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        canvas::{Canvas, Map, MapResolution, Points},
        Block, Borders, Clear, List, ListItem, Paragraph, Wrap,
    },
    Frame,
};

use crate::domain::{distance_km, Coordinate};
use crate::tui::app::TuiApp;

// Map viewport, a little wider than the Turkey bounding box the feeds use
const MAP_LON_BOUNDS: [f64; 2] = [23.0, 47.0];
const MAP_LAT_BOUNDS: [f64; 2] = [34.0, 44.0];

pub fn render(frame: &mut Frame, app: &TuiApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),      // Banner / header
            Constraint::Percentage(45), // Map pane
            Constraint::Min(8),         // Event list
            Constraint::Length(1),      // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_map_pane(frame, app, chunks[1]);
    render_list_pane(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    if app.show_safety_info {
        render_safety_overlay(frame, frame.area());
    }
}

fn render_header(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let paragraph = if app.emergency {
        Paragraph::new(" EARTHQUAKE ALERT: significant seismic activity near your location ")
            .style(
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            )
    } else {
        let location = app
            .user
            .map(|u| format!("{:.4}, {:.4}", u.lat, u.lon))
            .unwrap_or_else(|| "unknown".to_string());
        Paragraph::new(format!(
            " temblor | source: {} | filter: {} | you: {location}",
            app.source, app.magnitude_range
        ))
        .style(Style::default().fg(Color::White).bg(Color::DarkGray))
    };
    frame.render_widget(paragraph, area);
}

/// Marker color per magnitude band.
fn band_color(magnitude: f64) -> Color {
    if magnitude < 3.0 {
        Color::Green
    } else if magnitude < 5.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn render_map_pane(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let visible = app.visible_events();

    let mut low: Vec<(f64, f64)> = Vec::new();
    let mut medium: Vec<(f64, f64)> = Vec::new();
    let mut high: Vec<(f64, f64)> = Vec::new();
    for quake in &visible {
        let point = (quake.lon, quake.lat);
        match band_color(quake.magnitude) {
            Color::Green => low.push(point),
            Color::Yellow => medium.push(point),
            _ => high.push(point),
        }
    }
    let selected = app.selected_event().map(|e| (e.lon, e.lat));

    let canvas = Canvas::default()
        .block(Block::default().title(" Map ").borders(Borders::ALL))
        .x_bounds(MAP_LON_BOUNDS)
        .y_bounds(MAP_LAT_BOUNDS)
        .paint(move |ctx| {
            ctx.draw(&Map {
                color: Color::Gray,
                resolution: MapResolution::High,
            });
            ctx.draw(&Points {
                coords: &low,
                color: Color::Green,
            });
            ctx.draw(&Points {
                coords: &medium,
                color: Color::Yellow,
            });
            ctx.draw(&Points {
                coords: &high,
                color: Color::Red,
            });
            if let Some((lon, lat)) = selected {
                ctx.print(
                    lon,
                    lat,
                    Line::from(Span::styled(
                        "X",
                        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
                    )),
                );
            }
            if let Some(user) = app.user {
                ctx.print(
                    user.lon,
                    user.lat,
                    Line::from(Span::styled(
                        "@",
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    )),
                );
            }
        });

    frame.render_widget(canvas, area);
}

fn render_list_pane(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let title = format!(
        " Recent earthquakes ({}, {}/{}) ",
        app.source,
        app.visible_events().len(),
        app.events.len()
    );
    let block = Block::default().title(title).borders(Borders::ALL);

    if let Some(error) = &app.error {
        // A failed poll replaces the list until the next successful one
        let paragraph = Paragraph::new(Text::from(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("Error: {error}"),
                Style::default().fg(Color::Red),
            )),
            Line::from(""),
            Line::from("The list will refresh on the next successful poll."),
        ]))
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let visible = app.visible_events();
    if visible.is_empty() {
        let message = if app.events.is_empty() {
            "Waiting for the first poll..."
        } else {
            "No earthquakes match the current magnitude filter."
        };
        frame.render_widget(Paragraph::new(message).block(block), area);
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(i, quake)| {
            let distance = app
                .user
                .map(|user| {
                    format!(
                        " | {:.1} km",
                        distance_km(user, Coordinate::new(quake.lat, quake.lon))
                    )
                })
                .unwrap_or_default();
            let content = format!(
                "M{:<4.1} {}  {}{distance}",
                quake.magnitude,
                quake.time.format("%m/%d %H:%M"),
                quake.place,
            );

            let base_style = Style::default().fg(band_color(quake.magnitude));
            let style = if i == app.selected {
                Style::default()
                    .bg(Color::Cyan)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD)
            } else {
                base_style
            };

            ListItem::new(content).style(style)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_status_bar(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let status = if app.is_polling {
        format!("Polling {}...", app.source)
    } else if let Some(ref msg) = app.status_message {
        msg.clone()
    } else if app.test_alarm_on {
        "Test alarm playing, press t to stop".to_string()
    } else {
        "j/k:Navigate  s:Source  1-5:Magnitude  o:Open  t:Test alarm  i:Safety  R:Refresh  q:Quit"
            .to_string()
    };

    let paragraph =
        Paragraph::new(status).style(Style::default().fg(Color::White).bg(Color::DarkGray));

    frame.render_widget(paragraph, area);
}

fn render_safety_overlay(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(70, 60, area);

    let lines = vec![
        Line::from(Span::styled(
            "Earthquake Safety",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Drop, Cover, Hold On: drop to your hands and knees, take cover"),
        Line::from("under a sturdy desk or table, and hold on until shaking stops."),
        Line::from(""),
        Line::from("Indoors: stay inside, away from windows, glass and heavy"),
        Line::from("objects that could fall. Do not use elevators."),
        Line::from(""),
        Line::from("Outdoors: move to an open area away from buildings, trees,"),
        Line::from("streetlights and power lines."),
        Line::from(""),
        Line::from("Driving: pull over to a clear spot, stop, and stay in the"),
        Line::from("vehicle until the shaking stops."),
        Line::from(""),
        Line::from("Aftershocks: expect them. Each time one hits, Drop, Cover,"),
        Line::from("and Hold On again."),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title(" Safety Info ").borders(Borders::ALL))
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_colors() {
        assert_eq!(band_color(2.9), Color::Green);
        assert_eq!(band_color(3.0), Color::Yellow);
        assert_eq!(band_color(4.9), Color::Yellow);
        assert_eq!(band_color(5.0), Color::Red);
    }

    #[test]
    fn test_centered_rect_fits_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(70, 60, area);
        assert!(popup.width <= area.width);
        assert!(popup.height <= area.height);
        assert!(popup.x >= area.x && popup.y >= area.y);
    }
}
