//! Model rendering surface.
//!
//! The wizard only promises the surface `{ loading, params }` once it reaches the Finished phase;
//! everything a surface does with those raw values is its own concern.

pub mod query;

use crate::models::state::CollectedParams;
use query::ModelQuery;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

#[derive(Debug, Clone, Copy)]
pub struct SurfaceInput<'a> {
    pub loading: bool,
    pub params: &'a CollectedParams,
}

pub trait RenderSurface {
    fn render(&self, f: &mut Frame<'_>, area: Rect, input: &SurfaceInput<'_>);
}

/// Top-down floor outline sized from the answers.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlueprintSurface;

impl RenderSurface for BlueprintSurface {
    fn render(&self, f: &mut Frame<'_>, area: Rect, input: &SurfaceInput<'_>) {
        let block = Block::default().borders(Borders::ALL).title("Model Viewer");
        let inner = block.inner(area);
        f.render_widget(block, area);

        if input.loading {
            let waiting = Paragraph::new("Preparing model...")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            f.render_widget(waiting, inner);
            return;
        }

        let query = ModelQuery::from_params(input.params);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)].as_ref())
            .split(inner);

        let plan = fit_floor_plan(rows[0], query.width, query.length);
        let floor = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!("{} ft", trim_float(query.width)))
            .title_alignment(Alignment::Center);
        f.render_widget(floor, plan);

        let info = Paragraph::new(Text::from(vec![
            Line::from(Span::styled(
                query.project_summary(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "Length: {} ft  Height: {} ft",
                trim_float(query.length),
                trim_float(query.height)
            )),
            Line::from(Span::styled(
                format!("model?{}", query.query_string()),
                Style::default().fg(Color::DarkGray),
            )),
        ]))
        .wrap(Wrap { trim: true });
        f.render_widget(info, rows[1]);
    }
}

/// Largest rectangle inside `area` with the floor's proportions, centered. Terminal cells are
/// about twice as tall as wide, so one unit of width spans two columns.
pub fn fit_floor_plan(area: Rect, width: f64, length: f64) -> Rect {
    if area.width < 2 || area.height < 2 || width <= 0.0 || length <= 0.0 {
        return area;
    }
    let scale = (area.width as f64 / (width * 2.0)).min(area.height as f64 / length);
    let w = ((width * 2.0 * scale).round() as u16).clamp(2, area.width);
    let h = ((length * scale).round() as u16).clamp(2, area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

fn trim_float(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.1}", v)
    }
}
