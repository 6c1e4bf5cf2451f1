use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};

use alasr_types::{Masjid, Question, User};

use crate::app_error::AppResult;
use crate::application::calendar::{last_months, start_of_day, YearMonth};
use crate::application::ports::{MasjidGateway, QuestionGateway, UserGateway};

const TREND_MONTHS: usize = 6;
const TOP_MASAJIDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserGrowthPoint {
    pub month: &'static str,
    pub total: usize,
    pub super_admins: usize,
    pub regular: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MasjidActivity {
    pub name: String,
    pub questions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityPoint {
    pub month: &'static str,
    pub masajids: usize,
    pub users: usize,
    pub questions: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TodayStats {
    pub questions_today: usize,
    pub replied_today: usize,
    pub new_masajids: usize,
    pub new_users: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub total_masajids: usize,
    pub total_users: usize,
    pub total_questions: usize,
    pub growth_rate: String,
    pub user_growth: Vec<UserGrowthPoint>,
    pub top_masajids: Vec<MasjidActivity>,
    pub monthly_activity: Vec<ActivityPoint>,
    pub today: TodayStats,
}

#[derive(Clone)]
pub struct AnalyticsUseCases {
    masajids: Arc<dyn MasjidGateway>,
    users: Arc<dyn UserGateway>,
    questions: Arc<dyn QuestionGateway>,
}

impl AnalyticsUseCases {
    pub fn new(
        masajids: Arc<dyn MasjidGateway>,
        users: Arc<dyn UserGateway>,
        questions: Arc<dyn QuestionGateway>,
    ) -> Self {
        Self { masajids, users, questions }
    }

    #[instrument(skip(self))]
    pub async fn load(&self, now: DateTime<Utc>) -> AppResult<AnalyticsReport> {
        let (masajids, users, questions) = tokio::join!(
            self.masajids.list(true),
            self.users.list(true),
            self.questions.list(true),
        );
        let questions = questions.unwrap_or_else(|e| {
            warn!(error = %e, "Questions unavailable, analytics shows none");
            Vec::new()
        });
        let (masajids, users) = (masajids?, users?);

        let report = AnalyticsReport {
            total_masajids: masajids.len(),
            total_users: users.len(),
            total_questions: questions.len(),
            growth_rate: growth_rate(&users, now),
            user_growth: user_growth(&users, now),
            top_masajids: top_masajids(&masajids, &questions),
            monthly_activity: monthly_activity(&masajids, &users, &questions, now),
            today: today_stats(&masajids, &users, &questions, now),
        };
        info!(growth_rate = %report.growth_rate, "Analytics loaded");
        Ok(report)
    }
}

/// Users registered up to the end of each of the last six months.
pub fn user_growth(users: &[User], now: DateTime<Utc>) -> Vec<UserGrowthPoint> {
    last_months(now, TREND_MONTHS)
        .into_iter()
        .map(|month| {
            let end = month.end();
            let registered = users.iter().filter(|u| u.created_at < end);
            let (total, super_admins) = registered.fold((0, 0), |(total, admins), u| {
                (total + 1, admins + usize::from(u.is_super_admin))
            });
            UserGrowthPoint {
                month: month.label(),
                total,
                super_admins,
                regular: total - super_admins,
            }
        })
        .collect()
}

/// The five masajids with the most questions. Ties keep list order.
pub fn top_masajids(masajids: &[Masjid], questions: &[Question]) -> Vec<MasjidActivity> {
    let mut ranked: Vec<MasjidActivity> = masajids
        .iter()
        .map(|m| MasjidActivity {
            name: m.name.clone(),
            questions: questions.iter().filter(|q| q.masjid_id == m.id).count(),
        })
        .collect();
    ranked.sort_by(|a, b| b.questions.cmp(&a.questions));
    ranked.truncate(TOP_MASAJIDS);
    ranked
}

pub fn monthly_activity(
    masajids: &[Masjid],
    users: &[User],
    questions: &[Question],
    now: DateTime<Utc>,
) -> Vec<ActivityPoint> {
    last_months(now, TREND_MONTHS)
        .into_iter()
        .map(|month| {
            let end = month.end();
            ActivityPoint {
                month: month.label(),
                masajids: masajids.iter().filter(|m| m.created_at < end).count(),
                users: users.iter().filter(|u| u.created_at < end).count(),
                questions: questions.iter().filter(|q| q.submitted_at < end).count(),
            }
        })
        .collect()
}

/// Counts since UTC midnight.
pub fn today_stats(
    masajids: &[Masjid],
    users: &[User],
    questions: &[Question],
    now: DateTime<Utc>,
) -> TodayStats {
    let midnight = start_of_day(now);
    TodayStats {
        questions_today: questions.iter().filter(|q| q.submitted_at >= midnight).count(),
        replied_today: questions
            .iter()
            .filter(|q| q.replied_at.is_some_and(|at| at >= midnight))
            .count(),
        new_masajids: masajids.iter().filter(|m| m.created_at >= midnight).count(),
        new_users: users.iter().filter(|u| u.created_at >= midnight).count(),
    }
}

/// Registrations since the start of last month against the month before that.
pub fn growth_rate(users: &[User], now: DateTime<Utc>) -> String {
    let last_month = YearMonth::of(now).previous();
    let last_start = last_month.start();
    let previous_start = last_month.previous().start();

    let recent = users
        .iter()
        .filter(|u| u.created_at >= last_start && u.created_at < now)
        .count();
    let previous = users
        .iter()
        .filter(|u| u.created_at >= previous_start && u.created_at < last_start)
        .count();

    if previous == 0 {
        return "0%".to_string();
    }
    let growth = (recent as f64 - previous as f64) / previous as f64 * 100.0;
    format!("{growth:.1}%")
}
