//! JSON HTTP surface.
//!
//! Identity arrives in the `x-user-id` and `x-user-role` headers and is
//! turned into an [`Actor`](crate::identity::Actor) by the extractor in
//! [`extract`]. Handlers stay thin: they parse the request, check project
//! access where board data is involved, and delegate to the services held in
//! [`state::AppState`].
//!
//! | Method | Path |
//! |--------|------|
//! | GET | `/health` |
//! | POST | `/json/workspace/create` |
//! | POST | `/json/workspace/update/{id}` |
//! | DELETE | `/workspace/destroy/{id}` |
//! | POST | `/json/workspace/member/add` |
//! | POST | `/json/workspace/change` |
//! | GET | `/json/workspaces/mine` |
//! | GET | `/json/workspaces/all` |
//! | GET | `/json/workspace/{uid}` |
//! | GET | `/json/workspace/{uid}/members` |
//! | POST | `/json/project/create` |
//! | GET | `/json/projects/all/{workspace_id}` |
//! | GET | `/json/project/{project_id}` |
//! | POST | `/project/update/{id}` |
//! | DELETE | `/project/destroy/{id}` |
//! | GET | `/json/projects/recent` |
//! | POST | `/json/p/starred/save/{project_id}` |
//! | GET | `/json/projects/star` |
//! | GET, POST | `/json/project/{project_id}/lists` |
//! | GET | `/json/project/{project_id}/lists/{list_id}/tasks` |
//! | GET | `/json/project/{project_id}/archived` |
//! | POST | `/json/project/{project_id}/task-list` |
//! | POST | `/json/task/create` |
//! | GET, DELETE | `/json/task/{uid}` |
//! | POST | `/json/task/update/{id}` |
//! | GET | `/json/list/{id}/count` |
//! | POST | `/json/tasks/order` |

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use handlers::{board, health, project, workspace};
use state::AppState;

/// Builds the application router with request tracing.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/json/workspace/create", post(workspace::create))
        .route("/json/workspace/update/{id}", post(workspace::rename))
        .route("/workspace/destroy/{id}", delete(workspace::destroy))
        .route("/json/workspace/member/add", post(workspace::toggle_member))
        .route("/json/workspace/change", post(project::change_workspace))
        .route("/json/workspaces/mine", get(workspace::mine))
        .route("/json/workspaces/all", get(workspace::memberships))
        .route("/json/workspace/{uid}", get(workspace::find))
        .route("/json/workspace/{uid}/members", get(workspace::members))
        .route("/json/project/create", post(project::create))
        .route(
            "/json/projects/all/{workspace_id}",
            get(project::list_for_workspace),
        )
        .route("/json/project/{project_id}", get(project::find))
        .route("/project/update/{id}", post(project::update))
        .route("/project/destroy/{id}", delete(project::destroy))
        .route("/json/projects/recent", get(project::recent))
        .route(
            "/json/p/starred/save/{project_id}",
            post(project::toggle_star),
        )
        .route("/json/projects/star", get(project::starred))
        .route(
            "/json/project/{project_id}/lists",
            get(board::lists).post(board::create_list),
        )
        .route(
            "/json/project/{project_id}/lists/{list_id}/tasks",
            get(board::tasks_in_list),
        )
        .route("/json/project/{project_id}/archived", get(board::archived))
        .route("/json/project/{project_id}/task-list", post(board::reorder))
        .route("/json/task/create", post(board::create_task))
        .route(
            "/json/task/{uid}",
            get(board::find_task).delete(board::delete_task),
        )
        .route("/json/task/update/{id}", post(board::update_task))
        .route("/json/list/{id}/count", get(board::count_in_list))
        .route("/json/tasks/order", post(board::update_orders))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
