use super::todo_service::{TodoService, TodoServiceImpl};
use crate::domain::{
    list::{CreateList, UpdateList, DEFAULT_COLOR},
    repository::UserRepository,
    todo::CreateTodo,
    user::UserId,
};
use crate::error::Error;
use crate::infrastructure::sqlite_repo::SqliteRepository;

async fn setup() -> (TodoServiceImpl<SqliteRepository>, UserId) {
    let repo = SqliteRepository::open("sqlite::memory:").await.unwrap();
    let user = repo.create_user("owner@x.com", "hash").await.unwrap();
    (TodoServiceImpl::new(repo), user.id)
}

fn list(name: &str, color: &str) -> CreateList { CreateList { name: name.into(), color: color.into() } }

#[tokio::test]
async fn unit_update_list_keeps_omitted_fields() {
    let (service, owner) = setup().await;
    let created = service.create_list(owner, list("work", "#F8BBD9")).await.unwrap();

    service.update_list(owner, created.id, UpdateList { name: Some("office".into()), color: None }).await.unwrap();
    let lists = service.lists(owner).await.unwrap();
    assert_eq!(lists[0].name, "office");
    assert_eq!(lists[0].color, "#F8BBD9");

    service.update_list(owner, created.id, UpdateList { name: Some(String::new()), color: Some("#E1BEE7".into()) }).await.unwrap();
    let lists = service.lists(owner).await.unwrap();
    assert_eq!(lists[0].name, "office");
    assert_eq!(lists[0].color, "#E1BEE7");
}

#[tokio::test]
async fn unit_update_list_rejects_blank_name() {
    let (service, owner) = setup().await;
    let created = service.create_list(owner, list("work", "#F8BBD9")).await.unwrap();

    let res = service.update_list(owner, created.id, UpdateList { name: Some("   ".into()), color: None }).await;
    assert!(matches!(res, Err(Error::EmptyListName)));
    let lists = service.lists(owner).await.unwrap();
    assert_eq!(lists[0].name, "work");
}

#[tokio::test]
async fn unit_update_list_coerces_foreign_color() {
    let (service, owner) = setup().await;
    let created = service.create_list(owner, list("work", "#F8BBD9")).await.unwrap();
    service.update_list(owner, created.id, UpdateList { name: None, color: Some("#123456".into()) }).await.unwrap();
    assert_eq!(service.lists(owner).await.unwrap()[0].color, DEFAULT_COLOR);
}

#[tokio::test]
async fn unit_update_missing_list() {
    let (service, owner) = setup().await;
    let res = service.update_list(owner, crate::domain::list::ListId(99), UpdateList::default()).await;
    assert!(matches!(res, Err(Error::ListNotFound)));
}

#[tokio::test]
async fn unit_list_filter_dispatches_to_list_scope() {
    let (service, owner) = setup().await;
    let work = service.create_list(owner, list("work", "")).await.unwrap();
    let inside = service.create_in_list(owner, work.id, CreateTodo { title: "inside".into() }).await.unwrap();
    service.create(owner, CreateTodo { title: "outside".into() }).await.unwrap();

    let all = service.list(owner, None).await.unwrap();
    assert_eq!(all.len(), 2);
    let filtered = service.list(owner, Some(work.id)).await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, inside.id);
    assert_eq!(filtered[0].lists[0].id, work.id);
}
