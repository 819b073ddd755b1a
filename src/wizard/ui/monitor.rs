use ratatui::{prelude::*, widgets::{Block, Borders, Paragraph}};

use super::super::WizardApp;
use crate::deploy::{NAMESPACE, RELEASE_NAME};
use crate::ui::center_rect;

/// Terminal view shown once Kubescape is running in the cluster
pub fn draw_monitor(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let centered = center_rect(area, 64.min(area.width), 12.min(area.height));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(" Kubescape ");
    let inner = block.inner(centered);
    frame.render_widget(block, centered);

    if inner.height < 8 || inner.width < 20 {
        return;
    }

    let width = inner.width - 2;
    let mut lines = vec![
        (
            "Kubescape is deployed and scanning your cluster.".to_string(),
            app.theme.success_style().add_modifier(Modifier::BOLD),
        ),
        (String::new(), app.theme.style()),
        (
            format!("Release:    {RELEASE_NAME} (namespace {NAMESPACE})"),
            app.theme.style(),
        ),
    ];
    if let Some(ctx) = &app.cluster_context {
        lines.push((format!("Cluster:    {ctx}"), app.theme.style()));
    }
    if let Some(provider) = &app.chosen_provider {
        lines.push((format!("Provider:   {provider}"), app.theme.style()));
    }
    lines.push((String::new(), app.theme.style()));
    lines.push((
        format!("Results: {}", app.config.links.dashboard),
        app.theme.secondary_style(),
    ));

    for (i, (text, style)) in lines.into_iter().enumerate() {
        if i as u16 >= inner.height - 2 {
            break;
        }
        frame.render_widget(
            Paragraph::new(text).style(style),
            Rect::new(inner.x + 1, inner.y + i as u16, width, 1),
        );
    }

    let button_text = " [Enter] Open Dashboard ";
    frame.render_widget(
        Paragraph::new(button_text).style(app.theme.button_style(true)),
        Rect::new(
            inner.x + 1,
            inner.y + inner.height - 1,
            (button_text.len() as u16).min(width),
            1,
        ),
    );
}
