use std::path::Path;

use tasklist::controller::TaskController;
use tasklist::seed::StaticSeedSource;
use tasklist::storage::FileStorage;
use tasklist::store::feedback::feedback_channel;
use tasklist::{Field, TaskStore};

const DATA_FOLDER: &str = "example_data";

const SEED: &str = r#"[
    {"title": "Write the report", "category": "work", "importancy": true, "urgency": true, "progress": 40},
    {"title": "Book the train", "category": "travel", "startDate": "2024-06-01", "endDate": "2024-06-03"}
]"#;


#[tokio::main]
async fn main() {
    env_logger::init();

    let mut store = TaskStore::load(FileStorage::new(Path::new(DATA_FOLDER)));
    let (sender, receiver) = feedback_channel();
    store.set_feedback_channel(sender);
    let mut controller = TaskController::new(store);

    if controller.tasks().is_empty() {
        if controller.seed_from_external_source(&StaticSeedSource::new(SEED)).await == false {
            log::error!("Unable to seed the list");
        }
    }
    println!("---- stored tasks -----");
    tasklist::utils::print_task_list(&controller.search(""));

    controller.open_create();
    controller.update_draft_input(Field::Title, "Buy milk").unwrap();
    controller.update_draft_input(Field::Category, "personal").unwrap();
    controller.update_draft_input(Field::Urgency, "yes").unwrap();
    match controller.submit() {
        Ok(committed) => log::info!("{:?}", committed),
        Err(err) => log::error!("Unable to add the task: {}", err),
    }
    println!("Last save: {}", *receiver.borrow());

    println!("---- matching \"milk\" -----");
    tasklist::utils::print_task_list(&controller.search("milk"));

    let request = controller.request_delete(0).unwrap();
    println!("{} (answering no)", request.prompt());
    controller.resolve_delete(request, false).unwrap();

    println!("---- all tasks -----");
    tasklist::utils::print_task_list(&controller.search(""));
}
