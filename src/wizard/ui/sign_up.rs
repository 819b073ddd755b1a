use ratatui::{prelude::*, widgets::{Paragraph, Wrap}};

use super::super::steps::StepId;
use super::super::WizardApp;

pub fn draw_sign_up_step(frame: &mut Frame, area: Rect, app: &WizardApp) {
    if area.height < 12 || area.width < 32 {
        return;
    }

    let mut y = area.y + 1;
    let width = area.width - 4;

    frame.render_widget(
        Paragraph::new(StepId::SignUp.title()).style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Rect::new(area.x + 2, y, width, 1),
    );
    y += 2;

    frame.render_widget(
        Paragraph::new(
            "Kubescape needs an account ID and access key to register this cluster. \
             Create a free account, then copy both values from the settings page.",
        )
        .style(app.theme.style())
        .wrap(Wrap { trim: true }),
        Rect::new(area.x + 2, y, width, 3),
    );
    y += 4;

    frame.render_widget(
        Paragraph::new(app.config.links.sign_up.as_str()).style(app.theme.secondary_style()),
        Rect::new(area.x + 2, y, width, 1),
    );
    y += 2;

    frame.render_widget(
        Paragraph::new("Already have an account? Press l to continue.")
            .style(app.theme.muted_style()),
        Rect::new(area.x + 2, y, width, 1),
    );

    let button_text = " [Enter] Open Sign-up Page ";
    frame.render_widget(
        Paragraph::new(button_text).style(app.theme.button_style(true)),
        Rect::new(area.x + 2, area.y + area.height - 2, (button_text.len() as u16).min(width), 1),
    );
}
