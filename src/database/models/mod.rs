pub mod label;
pub mod task;
pub mod task_list;
pub mod user;

pub use label::{CreateLabel, Label, LabelChanges, NewLabel, UpdateLabel};
pub use task::{CreateTask, NewTask, Task, TaskChanges, UpdateTask};
pub use task_list::{CreateTaskList, NewTaskList, TaskList, TaskListChanges, UpdateTaskList};
pub use user::{NewUser, UpdateUser, User, UserChanges};

use uuid::Uuid;

/// Resources carrying an ownership field: the identity allowed to mutate or delete them.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}
