//! Plain-text rendering of records and reports.

use std::fmt::Write;

use alasr_types::{Masjid, MasjidMember, MasjidStatistics, Question, QuestionStatistics, User};

use crate::application::use_cases::analytics::AnalyticsReport;
use crate::application::use_cases::dashboard::DashboardSummary;
use crate::application::use_cases::questions::QuestionCounts;
use crate::application::use_cases::session::SessionInfo;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Left-aligned columns sized to their widest cell.
struct Table {
    header: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    fn new(header: Vec<&'static str>) -> Self {
        Self { header, rows: Vec::new() }
    }

    fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    fn render(&self) -> String {
        let mut widths: Vec<usize> = self.header.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        let header: Vec<String> = self.header.iter().map(|h| h.to_string()).collect();
        push_line(&mut out, &header, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule, &widths);
        for row in &self.rows {
            push_line(&mut out, row, &widths);
        }
        out
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

fn or_dash(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("-").to_string()
}

fn yes_no(value: bool) -> String {
    (if value { "yes" } else { "no" }).to_string()
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}

// ============================================================================
// Lists
// ============================================================================

pub fn users_table(users: &[&User]) -> String {
    let mut table = Table::new(vec!["ID", "NAME", "EMAIL", "SUPER ADMIN", "ACTIVE", "MASJID", "JOINED"]);
    for user in users {
        let masjid = user
            .masjid_assignment
            .as_ref()
            .map(|a| {
                let name = a.masjid_name.as_deref().unwrap_or(&a.masjid_id);
                format!("{name} ({})", a.role)
            });
        table.row(vec![
            user.id.clone(),
            user.name.clone(),
            user.email.clone(),
            yes_no(user.is_super_admin),
            yes_no(user.is_active),
            or_dash(masjid.as_deref()),
            user.created_at.format(DATE_FORMAT).to_string(),
        ]);
    }
    format!("{}{} user(s)\n", table.render(), users.len())
}

pub fn masajids_table(masajids: &[&Masjid]) -> String {
    let mut table = Table::new(vec!["ID", "NAME", "CITY", "COUNTRY", "ACTIVE", "REGISTERED"]);
    for masjid in masajids {
        table.row(vec![
            masjid.id.clone(),
            masjid.name.clone(),
            or_dash(masjid.city.as_deref()),
            or_dash(masjid.country.as_deref()),
            yes_no(masjid.is_active),
            masjid.created_at.format(DATE_FORMAT).to_string(),
        ]);
    }
    format!("{}{} masjid(s)\n", table.render(), masajids.len())
}

pub fn questions_table(questions: &[&Question], counts: QuestionCounts) -> String {
    let mut table = Table::new(vec!["ID", "TITLE", "ASKED BY", "MASJID", "STATUS", "SUBMITTED"]);
    for question in questions {
        table.row(vec![
            question.id.clone(),
            truncate(&question.title, 40),
            question.user_name.clone(),
            or_dash(question.masjid_name.as_deref()),
            question.status.to_string(),
            question.submitted_at.format(DATE_FORMAT).to_string(),
        ]);
    }
    format!(
        "{}{} shown | {} total, {} pending, {} replied\n",
        table.render(),
        questions.len(),
        counts.total,
        counts.pending,
        counts.replied
    )
}

pub fn members_table(members: &[MasjidMember]) -> String {
    if members.is_empty() {
        return "No members assigned.\n".to_string();
    }
    let mut table = Table::new(vec!["USER ID", "NAME", "EMAIL", "ROLE", "PERMISSIONS"]);
    for member in members {
        let permissions: Vec<&str> = member.permissions.iter().map(|p| p.as_str()).collect();
        table.row(vec![
            member.user_id.clone(),
            member.user_name.clone(),
            member.user_email.clone(),
            member.role.to_string(),
            permissions.join(", "),
        ]);
    }
    table.render()
}

// ============================================================================
// Details
// ============================================================================

pub fn user_details(user: &User) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} <{}>", user.name, user.email);
    let _ = writeln!(out, "  id:           {}", user.id);
    let _ = writeln!(out, "  phone:        {}", or_dash(user.phone.as_deref()));
    let _ = writeln!(out, "  super admin:  {}", yes_no(user.is_super_admin));
    let _ = writeln!(out, "  active:       {}", yes_no(user.is_active));
    let _ = writeln!(out, "  joined:       {}", user.created_at.format(DATETIME_FORMAT));
    if let Some(assignment) = &user.masjid_assignment {
        let granted: Vec<&str> = assignment
            .permissions
            .granted()
            .iter()
            .map(|p| p.as_str())
            .collect();
        let _ = writeln!(
            out,
            "  masjid:       {} as {}",
            assignment.masjid_name.as_deref().unwrap_or(&assignment.masjid_id),
            assignment.role
        );
        let _ = writeln!(out, "  permissions:  {}", or_dash(Some(granted.join(", ").as_str())));
    }
    out
}

pub fn masjid_details(masjid: &Masjid) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", masjid.name);
    let fields = [
        ("id", Some(masjid.id.as_str())),
        ("location", masjid.location.as_deref()),
        ("address", masjid.address.as_deref()),
        ("city", masjid.city.as_deref()),
        ("state", masjid.state.as_deref()),
        ("country", masjid.country.as_deref()),
        ("postal code", masjid.postal_code.as_deref()),
        ("email", masjid.contact_email.as_deref()),
        ("phone", masjid.contact_phone.as_deref()),
    ];
    for (label, value) in fields {
        let _ = writeln!(out, "  {:<13} {}", format!("{label}:"), or_dash(value));
    }
    let _ = writeln!(out, "  {:<13} {}", "active:", yes_no(masjid.is_active));
    let _ = writeln!(out, "  {:<13} {}", "registered:", masjid.created_at.format(DATETIME_FORMAT));
    out
}

pub fn question_details(question: &Question) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", question.title, question.status);
    let _ = writeln!(out, "  id:         {}", question.id);
    let _ = writeln!(out, "  asked by:   {} <{}>", question.user_name, question.user_email);
    let _ = writeln!(
        out,
        "  masjid:     {}",
        question.masjid_name.as_deref().unwrap_or(&question.masjid_id)
    );
    let _ = writeln!(out, "  submitted:  {}", question.submitted_at.format(DATETIME_FORMAT));
    let _ = writeln!(out, "\n{}\n", question.question_text);
    if let Some(reply) = &question.reply {
        let by = question.replied_by.as_deref().unwrap_or("unknown");
        let _ = writeln!(out, "Reply from {by}:\n{reply}");
        if let Some(at) = question.replied_at {
            let _ = writeln!(out, "  replied:    {}", at.format(DATETIME_FORMAT));
        }
    }
    out
}

pub fn masjid_statistics(
    masjid: &MasjidStatistics,
    questions: Option<&QuestionStatistics>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  members:            {}", masjid.total_members);
    let _ = writeln!(out, "  questions:          {}", masjid.total_questions);
    let _ = writeln!(out, "  pending questions:  {}", masjid.pending_questions);
    let _ = writeln!(out, "  events:             {}", masjid.total_events);
    let _ = writeln!(out, "  upcoming events:    {}", masjid.upcoming_events);
    if let Some(questions) = questions {
        let _ = writeln!(out, "  replied questions:  {}", questions.replied_questions);
        if let Some(avg) = questions.average_response_time {
            let _ = writeln!(out, "  avg response time:  {avg:.1}h");
        }
    }
    out
}

pub fn session(info: &SessionInfo) -> String {
    let mut out = format!("Signed in as {} <{}>\n", info.user.name, info.user.email);
    match info.expires_at {
        Some(at) => {
            let _ = writeln!(out, "Access token expires {}", at.format(DATETIME_FORMAT));
        }
        None => out.push_str("Access token expiry unknown\n"),
    }
    out
}

// ============================================================================
// Reports
// ============================================================================

pub fn dashboard(summary: &DashboardSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Masajids: {}   Users: {}   Questions: {}   Pending: {}\n",
        summary.total_masajids,
        summary.total_users,
        summary.total_questions,
        summary.pending_questions
    );

    let mut registrations = Table::new(vec!["MONTH", "MASAJIDS"]);
    for point in &summary.masjid_registrations {
        registrations.row(vec![point.month.to_string(), point.count.to_string()]);
    }
    let _ = writeln!(out, "Masjid registrations (cumulative)\n{}", registrations.render());

    let mut questions = Table::new(vec!["MONTH", "NEW", "REPLIED"]);
    for point in &summary.questions_by_month {
        questions.row(vec![
            point.month.to_string(),
            point.new.to_string(),
            point.replied.to_string(),
        ]);
    }
    let _ = writeln!(out, "Questions, last six months\n{}", questions.render());

    let _ = writeln!(
        out,
        "Users: {} super admin(s), {} regular",
        summary.user_distribution.super_admins, summary.user_distribution.regular
    );
    out
}

pub fn analytics(report: &AnalyticsReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Masajids: {}   Users: {}   Questions: {}   Growth: {}\n",
        report.total_masajids, report.total_users, report.total_questions, report.growth_rate
    );

    let today = &report.today;
    let _ = writeln!(
        out,
        "Today: {} question(s), {} repl(ies), {} new masjid(s), {} new user(s)\n",
        today.questions_today, today.replied_today, today.new_masajids, today.new_users
    );

    let mut growth = Table::new(vec!["MONTH", "TOTAL", "SUPER ADMINS", "REGULAR"]);
    for point in &report.user_growth {
        growth.row(vec![
            point.month.to_string(),
            point.total.to_string(),
            point.super_admins.to_string(),
            point.regular.to_string(),
        ]);
    }
    let _ = writeln!(out, "User growth\n{}", growth.render());

    let mut top = Table::new(vec!["MASJID", "QUESTIONS"]);
    for masjid in &report.top_masajids {
        top.row(vec![masjid.name.clone(), masjid.questions.to_string()]);
    }
    let _ = writeln!(out, "Most active masajids\n{}", top.render());

    let mut activity = Table::new(vec!["MONTH", "MASAJIDS", "USERS", "QUESTIONS"]);
    for point in &report.monthly_activity {
        activity.row(vec![
            point.month.to_string(),
            point.masajids.to_string(),
            point.users.to_string(),
            point.questions.to_string(),
        ]);
    }
    let _ = write!(out, "Monthly activity (cumulative)\n{}", activity.render());
    out
}
