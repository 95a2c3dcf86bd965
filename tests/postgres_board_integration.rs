//! Integration tests for the `PostgreSQL` adapters using embedded `PostgreSQL`.
//!
//! Each test runs in its own database cloned from a migrated template, wired
//! through [`AppState::postgres`] so the foreign keys between workspaces,
//! projects, lists, and tasks are exercised as they are in production.

#![cfg(feature = "postgres-integration")]
#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]
#![expect(
    clippy::indexing_slicing,
    reason = "Test code uses indexing after length checks"
)]
#![expect(
    clippy::print_stderr,
    reason = "Test cleanup warnings are informational"
)]

use std::sync::atomic::{AtomicUsize, Ordering};

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;
use taskboard::board::{
    domain::BoardListId,
    services::{CreateTaskRequest, TaskMoveRequest},
};
use taskboard::http::state::AppState;
use taskboard::identity::{Actor, UserId};
use taskboard::workspace::{
    adapters::postgres::{PostgresWorkspaceRepository, WorkspacePgPool},
    domain::{MemberRole, Project, ProjectId, TeamMember},
    ports::{WorkspaceRepository, WorkspaceRepositoryError},
    services::{CreateProjectRequest, CreateWorkspaceRequest, StarChange},
};
use tokio::runtime::Runtime;

const CREATE_WORKSPACES_SQL: &str =
    include_str!("../migrations/2026-10-01-000000_create_workspaces/up.sql");

const CREATE_BOARD_SQL: &str = include_str!("../migrations/2026-10-01-000001_create_board/up.sql");

const CREATE_RECENT_SQL: &str =
    include_str!("../migrations/2026-10-01-000002_create_recent_projects/up.sql");

/// Template database name for pre-migrated schema.
const TEMPLATE_DB: &str = "taskboard_test_template";

static DATABASE_COUNTER: AtomicUsize = AtomicUsize::new(0);

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to create test runtime")
}

fn unique_database(prefix: &str) -> String {
    let sequence = DATABASE_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}_{}_{sequence}", std::process::id())
}

/// Ensures the template database exists with the schema applied.
fn ensure_template(cluster: &TestCluster) -> Result<(), BoxError> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            execute_sql_statements(&mut conn, CREATE_WORKSPACES_SQL)?;
            execute_sql_statements(&mut conn, CREATE_BOARD_SQL)?;
            execute_sql_statements(&mut conn, CREATE_RECENT_SQL)?;
            Ok(())
        })
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(())
}

/// Executes each `;`-separated statement of a migration file.
fn execute_sql_statements(conn: &mut PgConnection, sql: &str) -> eyre::Result<()> {
    for statement in sql.split(';') {
        let trimmed = statement.trim();
        if trimmed.is_empty() || trimmed.lines().all(|line| line.trim().starts_with("--")) {
            continue;
        }
        diesel::sql_query(trimmed)
            .execute(conn)
            .map_err(|e| eyre::eyre!("SQL error: {e}\nStatement: {trimmed}"))?;
    }
    Ok(())
}

fn setup_pool(cluster: &TestCluster, db_name: &str) -> Result<WorkspacePgPool, BoxError> {
    cluster
        .create_database_from_template(db_name, TEMPLATE_DB)
        .map_err(|e| Box::new(e) as BoxError)?;
    let url = cluster.connection().database_url(db_name);
    let manager = ConnectionManager::<PgConnection>::new(url);
    let pool = Pool::builder()
        .max_size(2)
        .build(manager)
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(pool)
}

/// Guard that drops the test database even if the test panics.
struct CleanupGuard<'a> {
    cluster: &'a TestCluster,
    db_name: String,
}

impl<'a> CleanupGuard<'a> {
    const fn new(cluster: &'a TestCluster, db_name: String) -> Self {
        Self { cluster, db_name }
    }
}

impl Drop for CleanupGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.cluster.drop_database(&self.db_name) {
            eprintln!("Warning: failed to drop test database {}: {e}", self.db_name);
        }
    }
}

fn owner() -> Actor {
    Actor::user(UserId::new(1).expect("valid user id"))
}

fn seed_project(rt: &Runtime, state: &AppState) -> Project {
    let workspace = rt
        .block_on(
            state
                .workspaces
                .create(&owner(), CreateWorkspaceRequest::new("Platform")),
        )
        .expect("create workspace");
    rt.block_on(state.projects.create(
        &owner(),
        CreateProjectRequest::new(workspace.id(), "Release"),
    ))
    .expect("create project")
}

fn orders(rt: &Runtime, state: &AppState, project: &Project, list_id: BoardListId) -> Vec<String> {
    rt.block_on(state.tasks.tasks_in_list(project.id(), list_id))
        .expect("tasks in list")
        .iter()
        .map(|task| format!("{}:{}", task.title().as_str(), task.order().value()))
        .collect()
}

#[rstest]
fn created_tasks_append_and_slugs_disambiguate(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = unique_database("test_append");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let pool = setup_pool(shared_test_cluster, &db_name).expect("pool setup");
    let state = AppState::postgres(&pool);
    let rt = test_runtime();

    let project = seed_project(&rt, &state);
    let list = rt
        .block_on(state.tasks.create_list(&owner(), project.id(), "To do"))
        .expect("create list");
    let first = rt
        .block_on(state.tasks.create_task(
            &owner(),
            CreateTaskRequest::new(project.id(), list.id(), "Fix bug"),
        ))
        .expect("first task");
    let second = rt
        .block_on(state.tasks.create_task(
            &owner(),
            CreateTaskRequest::new(project.id(), list.id(), "Fix bug"),
        ))
        .expect("second task");

    assert_eq!(first.order().value(), 1);
    assert_eq!(second.order().value(), 2);
    assert_eq!(first.slug().map(|slug| slug.as_str()), Some("Fix-bug"));
    let expected = format!("Fix-bug-{}", second.id());
    assert_eq!(second.slug().map(|slug| slug.as_str()), Some(expected.as_str()));

    let found = rt
        .block_on(state.tasks.find_task(&expected))
        .expect("find by slug");
    assert_eq!(found.id(), second.id());
}

#[rstest]
fn moves_rewrite_both_lists_densely(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = unique_database("test_moves");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let pool = setup_pool(shared_test_cluster, &db_name).expect("pool setup");
    let state = AppState::postgres(&pool);
    let rt = test_runtime();

    let project = seed_project(&rt, &state);
    let doing = rt
        .block_on(state.tasks.create_list(&owner(), project.id(), "Doing"))
        .expect("create list");
    let done = rt
        .block_on(state.tasks.create_list(&owner(), project.id(), "Done"))
        .expect("create list");
    let mut moving = Vec::new();
    for (list, title) in [(&doing, "A"), (&doing, "B"), (&done, "X"), (&done, "Y")] {
        let task = rt
            .block_on(state.tasks.create_task(
                &owner(),
                CreateTaskRequest::new(project.id(), list.id(), title),
            ))
            .expect("create task");
        moving.push(task);
    }

    let outcome = rt
        .block_on(state.reorder.apply(
            project.id(),
            TaskMoveRequest::across_lists(moving[0].id(), doing.id(), done.id(), 2),
        ))
        .expect("move task");
    assert_eq!(outcome.updated, 4);
    assert_eq!(orders(&rt, &state, &project, doing.id()), ["B:1"]);
    assert_eq!(orders(&rt, &state, &project, done.id()), ["X:1", "A:2", "Y:3"]);

    rt.block_on(state.reorder.apply(
        project.id(),
        TaskMoveRequest::within_list(done.id(), 3, 1),
    ))
    .expect("move within list");
    assert_eq!(orders(&rt, &state, &project, done.id()), ["Y:1", "X:2", "A:3"]);
}

#[rstest]
fn explicit_orders_are_validated_as_a_batch(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = unique_database("test_orders");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let pool = setup_pool(shared_test_cluster, &db_name).expect("pool setup");
    let state = AppState::postgres(&pool);
    let rt = test_runtime();

    let project = seed_project(&rt, &state);
    let list = rt
        .block_on(state.tasks.create_list(&owner(), project.id(), "To do"))
        .expect("create list");
    let mut ids = Vec::new();
    for title in ["A", "B"] {
        let task = rt
            .block_on(state.tasks.create_task(
                &owner(),
                CreateTaskRequest::new(project.id(), list.id(), title),
            ))
            .expect("create task");
        ids.push(task.id());
    }

    let rejected = rt.block_on(state.tasks.update_orders(&[(ids[0], 3), (ids[1], 0)]));
    assert!(rejected.is_err());
    assert_eq!(orders(&rt, &state, &project, list.id()), ["A:1", "B:2"]);

    let updated = rt
        .block_on(state.tasks.update_orders(&[(ids[0], 2), (ids[1], 1)]))
        .expect("update orders");
    assert_eq!(updated, 2);
    assert_eq!(orders(&rt, &state, &project, list.id()), ["B:1", "A:2"]);
}

#[rstest]
fn stars_toggle_per_user(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = unique_database("test_stars");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let pool = setup_pool(shared_test_cluster, &db_name).expect("pool setup");
    let state = AppState::postgres(&pool);
    let rt = test_runtime();

    let project = seed_project(&rt, &state);
    let first = rt
        .block_on(state.projects.toggle_star(&owner(), project.id()))
        .expect("star");
    assert_eq!(first, StarChange::Starred);
    let starred = rt.block_on(state.projects.starred(&owner())).expect("starred");
    assert_eq!(starred.len(), 1);

    let second = rt
        .block_on(state.projects.toggle_star(&owner(), project.id()))
        .expect("unstar");
    assert_eq!(second, StarChange::Unstarred);
}

#[rstest]
fn duplicate_memberships_are_rejected(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = unique_database("test_members");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let pool = setup_pool(shared_test_cluster, &db_name).expect("pool setup");
    let state = AppState::postgres(&pool);
    let repository = PostgresWorkspaceRepository::new(pool);
    let rt = test_runtime();

    let workspace = rt
        .block_on(
            state
                .workspaces
                .create(&owner(), CreateWorkspaceRequest::new("Platform")),
        )
        .expect("create workspace");
    let again = TeamMember::new(
        workspace.id(),
        owner().user_id(),
        MemberRole::Member,
        owner().user_id(),
        &DefaultClock,
    );

    let result = rt.block_on(repository.add_member(&again));
    assert!(matches!(
        result,
        Err(WorkspaceRepositoryError::DuplicateMember { .. })
    ));
    let members = rt
        .block_on(repository.members(workspace.id()))
        .expect("members");
    assert_eq!(members.len(), 1);
    assert!(members[0].is_admin());
}

#[rstest]
fn reopening_refreshes_recent_projects(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = unique_database("test_recent");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let pool = setup_pool(shared_test_cluster, &db_name).expect("pool setup");
    let state = AppState::postgres(&pool);
    let rt = test_runtime();

    let first = seed_project(&rt, &state);
    let second = seed_project(&rt, &state);
    for project in [&first, &second, &first] {
        rt.block_on(state.projects.open(&owner(), &project.id().to_string()))
            .expect("open project");
    }

    let recent: Vec<ProjectId> = rt
        .block_on(state.projects.recent(&owner()))
        .expect("recent projects")
        .iter()
        .map(Project::id)
        .collect();
    assert_eq!(recent, [first.id(), second.id()]);
}

#[rstest]
fn deleting_a_workspace_cascades_to_its_board(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = unique_database("test_cascade");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let pool = setup_pool(shared_test_cluster, &db_name).expect("pool setup");
    let state = AppState::postgres(&pool);
    let rt = test_runtime();

    let project = seed_project(&rt, &state);
    let list = rt
        .block_on(state.tasks.create_list(&owner(), project.id(), "To do"))
        .expect("create list");
    let task = rt
        .block_on(state.tasks.create_task(
            &owner(),
            CreateTaskRequest::new(project.id(), list.id(), "Gone"),
        ))
        .expect("create task");
    rt.block_on(state.projects.toggle_star(&owner(), project.id()))
        .expect("star");

    rt.block_on(state.workspaces.delete(&owner(), project.workspace_id()))
        .expect("delete workspace");
    let purged = rt
        .block_on(state.projects.purge_workspace(project.workspace_id()))
        .expect("purge projects");

    assert!(purged.is_empty());
    assert!(
        rt.block_on(state.projects.starred(&owner()))
            .expect("starred")
            .is_empty()
    );
    assert!(rt.block_on(state.tasks.find_task(&task.id().to_string())).is_err());
    assert!(rt.block_on(state.tasks.find_list(list.id())).is_err());
}
