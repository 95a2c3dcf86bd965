//! Given steps for task reordering BDD scenarios.

use super::world::{BoardWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskboard::board::services::CreateTaskRequest;

#[given(r#"a list "{title}" with tasks "{tasks}""#)]
fn list_with_tasks(
    world: &mut BoardWorld,
    title: String,
    tasks: String,
) -> Result<(), eyre::Report> {
    let list = run_async(world.lifecycle.create_list(&world.actor, world.project_id, &title))
        .wrap_err("create list for reorder scenario")?;
    for task_title in tasks.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let task = run_async(world.lifecycle.create_task(
            &world.actor,
            CreateTaskRequest::new(world.project_id, list.id(), task_title),
        ))
        .wrap_err_with(|| format!("create task {task_title}"))?;
        world.tasks.insert(task_title.to_owned(), task.id());
    }
    world.lists.insert(title, list);
    Ok(())
}
