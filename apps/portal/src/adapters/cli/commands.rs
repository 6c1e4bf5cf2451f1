use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tokio::sync::watch;
use tracing::warn;

use alasr_sdk::PortalError;
use alasr_types::{
    AddMember, AssignmentUpdate, CreateMasjid, CreateUser, Masjid, MasjidAssignment, MemberRole,
    Permission, PermissionFlags, QuestionStatus, UpdateUser,
};

use crate::adapters::cli::render;
use crate::app_error::{AppError, AppResult};
use crate::application::state::PortalState;
use crate::application::use_cases::masajids::filter_masajids;
use crate::application::use_cases::questions::{count_questions, filter_questions};
use crate::application::use_cases::users::filter_users;
use crate::infra::badge_refresher::run_badge_refresh_loop;
use crate::infra::setup::AppContext;

#[derive(Parser, Debug)]
#[command(name = "alasr-portal", author, version, about = "Super admin console for the Al-Asr backend")]
pub struct Cli {
    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in with a super admin account
    Login {
        #[arg(long, env = "ALASR_EMAIL")]
        email: String,
        #[arg(long, env = "ALASR_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Totals and trends across the platform
    Dashboard,
    /// Growth, activity and today's numbers
    Analytics,
    #[command(subcommand)]
    Masajids(MasajidsCommand),
    #[command(subcommand)]
    Users(UsersCommand),
    #[command(subcommand)]
    Questions(QuestionsCommand),
    /// Print the pending question count whenever it changes
    Watch,
}

#[derive(Subcommand, Debug)]
pub enum MasajidsCommand {
    List {
        /// Match against name or city
        #[arg(long)]
        search: Option<String>,
    },
    Show { id: String },
    Create {
        #[command(flatten)]
        details: MasjidDetails,
    },
    /// Change the given fields, keeping the rest
    Update {
        id: String,
        #[command(flatten)]
        details: MasjidDetails,
    },
    Delete { id: String },
    Stats { id: String },
    Members { id: String },
    AddMember {
        masjid_id: String,
        user_id: String,
        #[arg(long, default_value = "admin")]
        role: MemberRole,
        /// Repeat for each permission, e.g. --permission can_view_questions
        #[arg(long = "permission")]
        permissions: Vec<Permission>,
    },
    RemoveMember { masjid_id: String, user_id: String },
}

#[derive(Args, Debug, Default)]
pub struct MasjidDetails {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub postal_code: Option<String>,
    #[arg(long)]
    pub contact_email: Option<String>,
    #[arg(long)]
    pub contact_phone: Option<String>,
}

impl MasjidDetails {
    /// Overlay the given fields on `base`.
    fn merge_into(self, base: CreateMasjid) -> CreateMasjid {
        CreateMasjid {
            name: self.name.unwrap_or(base.name),
            location: self.location.or(base.location),
            address: self.address.or(base.address),
            city: self.city.or(base.city),
            state: self.state.or(base.state),
            country: self.country.or(base.country),
            postal_code: self.postal_code.or(base.postal_code),
            contact_email: self.contact_email.or(base.contact_email),
            contact_phone: self.contact_phone.or(base.contact_phone),
        }
    }
}

fn form_from(masjid: Masjid) -> CreateMasjid {
    CreateMasjid {
        name: masjid.name,
        location: masjid.location,
        address: masjid.address,
        city: masjid.city,
        state: masjid.state,
        country: masjid.country,
        postal_code: masjid.postal_code,
        contact_email: masjid.contact_email,
        contact_phone: masjid.contact_phone,
    }
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    List {
        /// Match against name or email
        #[arg(long)]
        search: Option<String>,
    },
    Show { id: String },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "ALASR_NEW_USER_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        super_admin: bool,
        #[command(flatten)]
        assignment: AssignmentArgs,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[command(flatten)]
        assignment: AssignmentArgs,
        /// Remove the user's masjid assignment
        #[arg(long, conflicts_with = "masjid")]
        remove_assignment: bool,
    },
    Promote { id: String },
    Demote { id: String },
    Activate { id: String },
    Deactivate { id: String },
    Delete { id: String },
    SuperAdmins,
}

#[derive(Args, Debug)]
pub struct AssignmentArgs {
    /// Assign the user to this masjid
    #[arg(long)]
    pub masjid: Option<String>,
    #[arg(long, default_value = "admin")]
    pub role: MemberRole,
    #[arg(long = "permission", requires = "masjid")]
    pub permissions: Vec<Permission>,
}

#[derive(Subcommand, Debug)]
pub enum QuestionsCommand {
    List {
        /// Match against title, asker or masjid name
        #[arg(long)]
        search: Option<String>,
        /// new or replied
        #[arg(long)]
        status: Option<QuestionStatus>,
        /// Only questions asked at this masjid id
        #[arg(long)]
        masjid: Option<String>,
    },
    Show { id: String },
    Delete { id: String },
}

// ============================================================================
// Dispatch
// ============================================================================

pub async fn run(cli: Cli, ctx: &AppContext) -> AppResult<()> {
    let json = cli.json;
    let mut state = PortalState::default();

    match cli.command {
        Command::Login { email, password } => {
            let user = ctx.session.login(&mut state, &email, &password).await?;
            emit(json, &user, |u| format!("Welcome, {}!\n", u.name))
        }
        Command::Logout => {
            ctx.session.logout(&mut state).await;
            emit(json, &"signed out", |_| "Signed out.\n".to_string())
        }
        Command::Whoami => {
            let info = ctx.session.whoami()?;
            emit(json, &info, render::session)
        }
        command => {
            if !ctx.session.restore(&mut state) {
                return Err(AppError::NotAuthenticated);
            }
            run_signed_in(command, json, ctx, &mut state).await
        }
    }
}

async fn run_signed_in(
    command: Command,
    json: bool,
    ctx: &AppContext,
    state: &mut PortalState,
) -> AppResult<()> {
    match command {
        Command::Dashboard => {
            let summary = ctx.dashboard.load(Utc::now()).await?;
            emit(json, &summary, render::dashboard)
        }
        Command::Analytics => {
            let report = ctx.analytics.load(Utc::now()).await?;
            emit(json, &report, render::analytics)
        }
        Command::Masajids(command) => masajids(command, json, ctx, state).await,
        Command::Users(command) => users(command, json, ctx, state).await,
        Command::Questions(command) => questions(command, json, ctx, state).await,
        Command::Watch => watch_pending(ctx).await,
        Command::Login { .. } | Command::Logout | Command::Whoami => Ok(()),
    }
}

async fn masajids(
    command: MasajidsCommand,
    json: bool,
    ctx: &AppContext,
    state: &mut PortalState,
) -> AppResult<()> {
    let use_cases = &ctx.masajids;
    match command {
        MasajidsCommand::List { search } => {
            use_cases.load(state).await?;
            let shown = filter_masajids(&state.masajids.items, search.as_deref().unwrap_or(""));
            emit(json, &shown, |m| render::masajids_table(m))
        }
        MasajidsCommand::Show { id } => {
            let masjid = use_cases.get(&id).await?;
            emit(json, &masjid, render::masjid_details)
        }
        MasajidsCommand::Create { details } => {
            let masjid = use_cases
                .save(state, None, details.merge_into(CreateMasjid::default()))
                .await?;
            emit(json, &masjid, |m| format!("Created masjid {} ({})\n", m.name, m.id))
        }
        MasajidsCommand::Update { id, details } => {
            let current = use_cases.get(&id).await?;
            let form = details.merge_into(form_from(current));
            let masjid = use_cases.save(state, Some(&id), form).await?;
            emit(json, &masjid, |m| format!("Updated masjid {} ({})\n", m.name, m.id))
        }
        MasajidsCommand::Delete { id } => {
            use_cases.delete(state, &id).await?;
            emit(json, &id, |id| format!("Deleted masjid {id}\n"))
        }
        MasajidsCommand::Stats { id } => {
            let stats = use_cases.statistics(&id).await?;
            let questions = match ctx.questions.masjid_statistics(&id).await {
                Ok(questions) => Some(questions),
                Err(e) => {
                    warn!(error = %e, "Question statistics unavailable");
                    None
                }
            };
            if json {
                return print_json(&serde_json::json!({ "masjid": stats, "questions": questions }));
            }
            print!("{}", render::masjid_statistics(&stats, questions.as_ref()));
            Ok(())
        }
        MasajidsCommand::Members { id } => {
            let members = use_cases.members(&id).await?;
            emit(json, &members, |m| render::members_table(m))
        }
        MasajidsCommand::AddMember { masjid_id, user_id, role, permissions } => {
            use_cases.load_users_for_forms(state).await;
            if !state.users.items.is_empty() && state.users.find(&user_id).is_none() {
                return Err(AppError::NotFound(format!("User {user_id}")));
            }
            let member = AddMember { user_id, role, permissions };
            let members = use_cases.add_member(&masjid_id, &member).await?;
            emit(json, &members, |m| render::members_table(m))
        }
        MasajidsCommand::RemoveMember { masjid_id, user_id } => {
            let members = use_cases.remove_member(&masjid_id, &user_id).await?;
            emit(json, &members, |m| render::members_table(m))
        }
    }
}

async fn users(
    command: UsersCommand,
    json: bool,
    ctx: &AppContext,
    state: &mut PortalState,
) -> AppResult<()> {
    let use_cases = &ctx.users;
    match command {
        UsersCommand::List { search } => {
            use_cases.load(state).await?;
            let shown = filter_users(&state.users.items, search.as_deref().unwrap_or(""));
            emit(json, &shown, |u| render::users_table(u))
        }
        UsersCommand::Show { id } => {
            let user = use_cases.get(&id).await?;
            emit(json, &user, render::user_details)
        }
        UsersCommand::Create { name, email, password, phone, super_admin, assignment } => {
            let masjid_assignment = assignment_from(&assignment, ctx, state).await?;
            let user = use_cases
                .create(
                    state,
                    CreateUser {
                        name,
                        email,
                        password,
                        phone,
                        is_super_admin: super_admin.then_some(true),
                        masjid_assignment,
                    },
                )
                .await?;
            emit(json, &user, |u| format!("Created user {} ({})\n", u.email, u.id))
        }
        UsersCommand::Update { id, name, email, password, phone, assignment, remove_assignment } => {
            let masjid_assignment = if remove_assignment {
                AssignmentUpdate::Remove
            } else {
                match assignment_from(&assignment, ctx, state).await? {
                    Some(assignment) => AssignmentUpdate::Set(assignment),
                    None => AssignmentUpdate::Unchanged,
                }
            };
            let changes = UpdateUser {
                name,
                email,
                password,
                phone,
                is_active: None,
                masjid_assignment,
            };
            let user = use_cases.update(state, &id, changes).await?;
            emit(json, &user, |u| format!("Updated user {} ({})\n", u.email, u.id))
        }
        UsersCommand::Promote { id } => {
            let user = use_cases.promote(state, &id).await?;
            emit(json, &user, |u| format!("{} is now a super admin\n", u.email))
        }
        UsersCommand::Demote { id } => {
            let user = use_cases.demote(state, &id).await?;
            emit(json, &user, |u| format!("{} is no longer a super admin\n", u.email))
        }
        UsersCommand::Activate { id } => {
            let user = use_cases.set_active(state, &id, true).await?;
            emit(json, &user, |u| format!("Activated {}\n", u.email))
        }
        UsersCommand::Deactivate { id } => {
            let user = use_cases.set_active(state, &id, false).await?;
            emit(json, &user, |u| format!("Deactivated {}\n", u.email))
        }
        UsersCommand::Delete { id } => {
            use_cases.delete(state, &id).await?;
            emit(json, &id, |id| format!("Deleted user {id}\n"))
        }
        UsersCommand::SuperAdmins => {
            let admins = use_cases.super_admins().await?;
            let shown: Vec<_> = admins.iter().collect();
            emit(json, &shown, |u| render::users_table(u))
        }
    }
}

/// Resolve `--masjid` against the cached masjid list.
async fn assignment_from(
    args: &AssignmentArgs,
    ctx: &AppContext,
    state: &mut PortalState,
) -> AppResult<Option<MasjidAssignment>> {
    let Some(masjid_id) = args.masjid.as_deref().map(str::trim) else {
        return Ok(None);
    };

    ctx.users.load_masajids_for_forms(state).await;
    let masjid_name = state.masajids.find(masjid_id).map(|m| m.name.clone());
    if masjid_name.is_none() && !state.masajids.items.is_empty() {
        return Err(AppError::NotFound(format!("Masjid {masjid_id}")));
    }

    Ok(Some(MasjidAssignment {
        masjid_id: masjid_id.to_string(),
        masjid_name,
        role: args.role,
        permissions: PermissionFlags::from_granted(&args.permissions),
    }))
}

async fn questions(
    command: QuestionsCommand,
    json: bool,
    ctx: &AppContext,
    state: &mut PortalState,
) -> AppResult<()> {
    let use_cases = &ctx.questions;
    match command {
        QuestionsCommand::List { search, status, masjid } => {
            match masjid {
                Some(masjid_id) => use_cases.load_for_masjid(state, &masjid_id).await?,
                None => use_cases.load(state).await?,
            }
            let items = &state.questions.items;
            let shown = filter_questions(items, search.as_deref().unwrap_or(""), status);
            let counts = count_questions(items);
            emit(json, &shown, |q| render::questions_table(q, counts))
        }
        QuestionsCommand::Show { id } => {
            let question = use_cases.get(&id).await?;
            emit(json, &question, render::question_details)
        }
        QuestionsCommand::Delete { id } => {
            use_cases.delete(state, &id).await?;
            emit(json, &id, |id| format!("Deleted question {id}\n"))
        }
    }
}

async fn watch_pending(ctx: &AppContext) -> AppResult<()> {
    let (tx, mut rx) = watch::channel(0usize);
    let refresher = tokio::spawn(run_badge_refresh_loop(
        ctx.questions.clone(),
        ctx.config.badge_refresh,
        tx,
    ));

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let pending = *rx.borrow_and_update();
                println!("{} pending question(s)", pending);
            }
            _ = tokio::signal::ctrl_c() => {
                refresher.abort();
                return Ok(());
            }
        }
    }

    // The refresher dropped the badge: it stopped on a session error.
    match refresher.await {
        Ok(result) => result,
        Err(e) => {
            warn!(error = %e, "Badge refresh task ended abnormally");
            Ok(())
        }
    }
}

// ============================================================================
// Output
// ============================================================================

fn emit<T: Serialize + ?Sized>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> AppResult<()> {
    if json {
        return print_json(value);
    }
    print!("{}", text(value));
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Portal(PortalError::Decode(e.to_string())))?;
    println!("{rendered}");
    Ok(())
}
