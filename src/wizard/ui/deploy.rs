use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::super::steps::StepId;
use super::super::{DeployField, TaskState, WizardApp};
use crate::deploy::is_valid_identifier;
use crate::vim::{InputBuffer, VimMode};

pub fn draw_deploy_step(frame: &mut Frame, area: Rect, app: &WizardApp) {
    if area.height < 14 || area.width < 40 {
        return;
    }

    let mut y = area.y + 1;
    let width = area.width - 4;

    frame.render_widget(
        Paragraph::new(StepId::Deploy.title())
            .style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Rect::new(area.x + 2, y, width, 1),
    );
    y += 2;

    draw_field(frame, Rect::new(area.x + 2, y, width, 1), app, "Account ID", &app.account_id, DeployField::AccountId);
    y += 2;

    if app.requires_access_key() {
        draw_field(frame, Rect::new(area.x + 2, y, width, 1), app, "Access key", &app.access_key, DeployField::AccessKey);
        y += 2;
    }

    let context = app.cluster_context.as_deref().unwrap_or("(unknown)");
    frame.render_widget(
        Paragraph::new(format!("Cluster     {context}")).style(app.theme.muted_style()),
        Rect::new(area.x + 2, y, width, 1),
    );
    y += 2;

    // Task list while deploying or after an attempt
    for task in &app.tasks {
        if y >= area.y + area.height - 3 {
            break;
        }
        let (status_char, style) = match task.status {
            TaskState::Pending => (' ', app.theme.muted_style()),
            TaskState::Running => (app.spinner_char(), app.theme.primary_style()),
            TaskState::Success => ('x', app.theme.success_style()),
            TaskState::Failed => ('!', app.theme.error_style()),
        };
        frame.render_widget(
            Paragraph::new(format!("[{status_char}] {}", task.name)).style(style),
            Rect::new(area.x + 2, y, width, 1),
        );
        y += 1;
    }
    if !app.tasks.is_empty() {
        y += 1;
    }

    // Output of the last attempt, newest lines at the bottom, helm's error last
    let output_bottom = area.y + area.height - 3;
    let has_output = !app.deploy_output.is_empty() || app.deploy_error.is_some();
    if has_output && output_bottom > y + 2 {
        let output_area = Rect::new(area.x + 2, y, width, output_bottom - y);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(app.theme.border_style())
            .title(" Output ");
        let inner = block.inner(output_area);

        let mut lines: Vec<Line> = app
            .deploy_output
            .lines()
            .map(|l| Line::styled(l.to_string(), app.theme.style()))
            .collect();
        if let Some(error) = &app.deploy_error {
            lines.extend(
                error
                    .lines()
                    .map(|l| Line::styled(l.to_string(), app.theme.error_style())),
            );
        }

        // Keep the tail visible, counting wrapped rows
        let rows: usize = lines
            .iter()
            .map(|l| l.width().max(1).div_ceil(inner.width.max(1) as usize))
            .sum();
        let scroll = rows.saturating_sub(inner.height as usize) as u16;
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .scroll((scroll, 0))
                .block(block),
            output_area,
        );
    }

    if !app.is_executing {
        let (button_text, enabled) = if app.sequencer.is_deployed() && !app.deploy_failed {
            (" Deployed - press l to continue ", true)
        } else {
            (" [Enter] Deploy Kubescape ", app.submit_available)
        };
        frame.render_widget(
            Paragraph::new(button_text).style(app.theme.button_style(enabled)),
            Rect::new(area.x + 2, area.y + area.height - 2, (button_text.len() as u16).min(width), 1),
        );
    }
}

fn draw_field(
    frame: &mut Frame,
    area: Rect,
    app: &WizardApp,
    label: &str,
    buffer: &InputBuffer,
    field: DeployField,
) {
    let is_focused = app.deploy_field == field && !app.is_executing;
    let is_insert = is_focused && app.vim_mode == VimMode::Insert;

    frame.render_widget(
        Paragraph::new(label).style(if is_focused {
            app.theme.primary_style()
        } else {
            app.theme.style()
        }),
        Rect::new(area.x, area.y, 12, 1),
    );

    let display = buffer.display('*');
    let field_x = area.x + 12;
    let field_width = area.width.saturating_sub(14);

    let mut spans = if is_insert {
        let before: String = display.chars().take(buffer.cursor()).collect();
        let after: String = display.chars().skip(buffer.cursor()).collect();
        vec![
            Span::styled(before, app.theme.style()),
            Span::styled("|", app.theme.primary_style().add_modifier(Modifier::BOLD)),
            Span::styled(after, app.theme.style()),
        ]
    } else if display.is_empty() {
        vec![Span::styled("(empty)", app.theme.muted_style())]
    } else {
        vec![Span::styled(display, app.theme.style())]
    };

    // Inline validation, non-fatal until submit
    let content = buffer.content();
    if !content.is_empty() {
        if is_valid_identifier(content.trim()) {
            spans.push(Span::styled("  ok", app.theme.success_style()));
        } else if !is_insert || buffer.len() >= 36 {
            spans.push(Span::styled("  invalid", app.theme.error_style()));
        }
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)),
        Rect::new(field_x, area.y, field_width, 1),
    );
}
