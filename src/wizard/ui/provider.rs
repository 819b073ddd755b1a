use ratatui::{prelude::*, widgets::Paragraph};

use super::super::steps::StepId;
use super::super::WizardApp;

pub fn draw_provider_step(frame: &mut Frame, area: Rect, app: &WizardApp) {
    if area.height < 6 || area.width < 20 {
        return;
    }

    let mut y = area.y + 1;
    let width = area.width - 4;

    frame.render_widget(
        Paragraph::new(StepId::SelectProvider.title())
            .style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Rect::new(area.x + 2, y, width, 1),
    );
    y += 2;

    frame.render_widget(
        Paragraph::new("Where should Kubescape send its scan results?").style(app.theme.style()),
        Rect::new(area.x + 2, y, width, 1),
    );
    y += 2;

    let bottom = area.y + area.height;
    for (idx, provider) in app.providers.iter().enumerate() {
        if y >= bottom {
            break;
        }

        let is_cursor = idx == app.provider_selected;
        let is_chosen = app.chosen_provider.as_deref() == Some(provider.name.as_str());
        let marker = if is_chosen { "(*)" } else { "( )" };
        let cursor = if is_cursor { ">" } else { " " };

        let style = if is_cursor {
            app.theme.primary_style().add_modifier(Modifier::BOLD)
        } else {
            app.theme.style()
        };
        frame.render_widget(
            Paragraph::new(format!("{cursor} {marker} {}", provider.name)).style(style),
            Rect::new(area.x + 2, y, width, 1),
        );
        y += 1;

        if !provider.description.is_empty() && y < bottom {
            frame.render_widget(
                Paragraph::new(format!("      {}", provider.description))
                    .style(app.theme.muted_style()),
                Rect::new(area.x + 2, y, width, 1),
            );
            y += 1;
        }
    }
}
