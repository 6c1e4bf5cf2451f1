use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};

use alasr_types::{Masjid, Question, QuestionStatus, User};

use crate::app_error::AppResult;
use crate::application::calendar::{last_months, months_of_year};
use crate::application::ports::{MasjidGateway, QuestionGateway, UserGateway};
use crate::application::use_cases::questions::count_questions;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    pub month: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionMonth {
    pub month: &'static str,
    pub new: usize,
    pub replied: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserDistribution {
    pub super_admins: usize,
    pub regular: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_masajids: usize,
    pub total_users: usize,
    pub total_questions: usize,
    pub pending_questions: usize,
    /// Running total of registered masajids at the end of each month this year.
    pub masjid_registrations: Vec<MonthCount>,
    /// Questions submitted in each of the last six months.
    pub questions_by_month: Vec<QuestionMonth>,
    pub user_distribution: UserDistribution,
}

#[derive(Clone)]
pub struct DashboardUseCases {
    masajids: Arc<dyn MasjidGateway>,
    users: Arc<dyn UserGateway>,
    questions: Arc<dyn QuestionGateway>,
}

impl DashboardUseCases {
    pub fn new(
        masajids: Arc<dyn MasjidGateway>,
        users: Arc<dyn UserGateway>,
        questions: Arc<dyn QuestionGateway>,
    ) -> Self {
        Self { masajids, users, questions }
    }

    /// Fetch all three lists from the cache and aggregate them.
    ///
    /// A failed question fetch counts as no questions; the other two fail the load.
    #[instrument(skip(self))]
    pub async fn load(&self, now: DateTime<Utc>) -> AppResult<DashboardSummary> {
        let (masajids, users, questions) = tokio::join!(
            self.masajids.list(true),
            self.users.list(true),
            self.questions.list(true),
        );
        let questions = questions.unwrap_or_else(|e| {
            warn!(error = %e, "Questions unavailable, dashboard shows none");
            Vec::new()
        });
        let summary = summarize(&masajids?, &users?, &questions, now);

        info!(
            masajids = summary.total_masajids,
            users = summary.total_users,
            questions = summary.total_questions,
            "Dashboard loaded"
        );
        Ok(summary)
    }
}

pub fn summarize(
    masajids: &[Masjid],
    users: &[User],
    questions: &[Question],
    now: DateTime<Utc>,
) -> DashboardSummary {
    let counts = count_questions(questions);
    DashboardSummary {
        total_masajids: masajids.len(),
        total_users: users.len(),
        total_questions: counts.total,
        pending_questions: counts.pending,
        masjid_registrations: masjid_registrations(masajids, now),
        questions_by_month: questions_by_month(questions, now),
        user_distribution: user_distribution(users),
    }
}

pub fn masjid_registrations(masajids: &[Masjid], now: DateTime<Utc>) -> Vec<MonthCount> {
    months_of_year(now)
        .into_iter()
        .map(|month| {
            let end = month.end();
            MonthCount {
                month: month.label(),
                count: masajids.iter().filter(|m| m.created_at < end).count(),
            }
        })
        .collect()
}

pub fn questions_by_month(questions: &[Question], now: DateTime<Utc>) -> Vec<QuestionMonth> {
    last_months(now, 6)
        .into_iter()
        .map(|month| {
            let submitted = questions.iter().filter(|q| month.contains(q.submitted_at));
            let (new, replied) = submitted.fold((0, 0), |(new, replied), q| match q.status {
                QuestionStatus::New => (new + 1, replied),
                QuestionStatus::Replied => (new, replied + 1),
            });
            QuestionMonth { month: month.label(), new, replied }
        })
        .collect()
}

pub fn user_distribution(users: &[User]) -> UserDistribution {
    let super_admins = users.iter().filter(|u| u.is_super_admin).count();
    UserDistribution {
        super_admins,
        regular: users.len() - super_admins,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        create_test_masjid, create_test_question, create_test_user, InMemoryMasjidGateway,
        InMemoryQuestionGateway, InMemoryUserGateway,
    };
    use chrono::TimeZone;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_registrations_are_cumulative_per_calendar_month() {
        let now = at(2025, 4, 10);
        let masajids = vec![
            create_test_masjid(|m| m.created_at = at(2024, 3, 1)),
            create_test_masjid(|m| m.created_at = at(2025, 2, 3)),
            create_test_masjid(|m| m.created_at = at(2025, 2, 28)),
            create_test_masjid(|m| m.created_at = at(2025, 4, 1)),
        ];

        let series = masjid_registrations(&masajids, now);

        assert_eq!(series.len(), 12);
        assert_eq!(series[0], MonthCount { month: "Jan", count: 1 });
        assert_eq!(series[1].count, 3);
        assert_eq!(series[2].count, 3);
        assert_eq!(series[3].count, 4);
        assert_eq!(series[11].count, 4);
    }

    #[test]
    fn test_questions_by_month_ignores_same_month_of_other_years() {
        let now = at(2025, 3, 15);
        let questions = vec![
            create_test_question(|q| {
                q.submitted_at = at(2025, 3, 2);
                q.status = QuestionStatus::New;
            }),
            create_test_question(|q| {
                q.submitted_at = at(2025, 1, 20);
                q.status = QuestionStatus::Replied;
            }),
            create_test_question(|q| {
                q.submitted_at = at(2024, 3, 2);
                q.status = QuestionStatus::New;
            }),
        ];

        let series = questions_by_month(&questions, now);

        let labels: Vec<_> = series.iter().map(|m| m.month).collect();
        assert_eq!(labels, vec!["Oct", "Nov", "Dec", "Jan", "Feb", "Mar"]);
        assert_eq!(series[5], QuestionMonth { month: "Mar", new: 1, replied: 0 });
        assert_eq!(series[3], QuestionMonth { month: "Jan", new: 0, replied: 1 });
    }

    #[test]
    fn test_user_distribution() {
        let users = vec![
            create_test_user(|u| u.is_super_admin = true),
            create_test_user(|_| {}),
            create_test_user(|_| {}),
        ];

        assert_eq!(
            user_distribution(&users),
            UserDistribution { super_admins: 1, regular: 2 }
        );
    }

    #[tokio::test]
    async fn test_load_tolerates_question_failure() {
        let masajids = Arc::new(InMemoryMasjidGateway::with_masajids(vec![create_test_masjid(
            |_| {},
        )]));
        let users = Arc::new(InMemoryUserGateway::with_users(vec![create_test_user(|_| {})]));
        let questions = Arc::new(InMemoryQuestionGateway::with_questions(vec![
            create_test_question(|_| {}),
        ]));
        questions.fail_next_list("rate limited");
        let dashboard = DashboardUseCases::new(masajids.clone(), users, questions);

        let summary = dashboard.load(at(2025, 5, 1)).await.unwrap();

        assert_eq!(summary.total_masajids, 1);
        assert_eq!(summary.total_users, 1);
        assert_eq!(summary.total_questions, 0);
        assert_eq!(masajids.list_calls(), vec![true]);
    }

    #[tokio::test]
    async fn test_load_fails_when_masajids_fail() {
        let masajids = Arc::new(InMemoryMasjidGateway::new());
        masajids.fail_next_list("down");
        let dashboard = DashboardUseCases::new(
            masajids,
            Arc::new(InMemoryUserGateway::new()),
            Arc::new(InMemoryQuestionGateway::new()),
        );

        assert!(dashboard.load(at(2025, 5, 1)).await.is_err());
    }
}
