use bookstore::domain::book::NewBook;
use bookstore::domain::category::NewCategory;
use bookstore::domain::order::{NewOrder, NewPayment, ShippingAddress};
use bookstore::domain::settings::NewSiteSettings;
use bookstore::domain::subscriber::{NewSubscriber, NotificationPreferences};
use bookstore::domain::types::{
    BookCondition, BookId, BookTitle, CategoryId, CategoryName, CategoryPath, DiscountPercent,
    Email, OrderStatus, PersonName, PhoneNumber, Price, Quantity, StockQuantity,
    SubscriberStatus,
};
use bookstore::repository::{
    BookListQuery, BookReader, BookWriter, CategoryReader, CategoryWriter, DieselRepository,
    OrderListQuery, OrderReader, OrderWriter, RepositoryError, SettingsReader, SettingsWriter,
    SubscriberReader, SubscriberWriter,
};
use chrono::Utc;

mod common;

fn path(raw: &str) -> CategoryPath {
    CategoryPath::new(raw).expect("valid path")
}

fn add_category(
    repo: &DieselRepository,
    name: &str,
    raw_path: &str,
    parent_id: Option<CategoryId>,
    discount: f64,
) -> bookstore::domain::category::Category {
    let now = Utc::now().naive_utc();
    repo.create_category(&NewCategory {
        name: CategoryName::new(name).expect("valid name"),
        path: path(raw_path),
        parent_id,
        tags: vec![],
        seo_title: None,
        seo_description: None,
        discount: DiscountPercent::new(discount).expect("valid discount"),
        created_at: now,
        updated_at: now,
    })
    .expect("should create category")
}

fn add_book(repo: &DieselRepository, title: &str, raw_path: &str, stock_new: i32) -> BookId {
    let now = Utc::now().naive_utc();
    repo.create_book(&NewBook {
        title: BookTitle::new(title).expect("valid title"),
        category_path: path(raw_path),
        tags: vec![],
        seo_title: None,
        seo_description: None,
        price: Some(Price::new(250.0).expect("valid price")),
        description: None,
        estimated_delivery: None,
        condition: BookCondition::New,
        author: None,
        publisher: None,
        image_url: None,
        quantity_new: StockQuantity::new(stock_new).expect("valid stock"),
        quantity_old: StockQuantity::ZERO,
        discount_new: DiscountPercent::ZERO,
        discount_old: DiscountPercent::ZERO,
        is_best_seller: false,
        is_new_arrival: true,
        created_at: now,
        updated_at: now,
    })
    .expect("should create book")
    .id
}

fn order_for(book_id: BookId, quantity: i32, status: OrderStatus) -> NewOrder {
    let now = Utc::now().naive_utc();
    NewOrder {
        user_id: None,
        customer_name: PersonName::new("Asha").unwrap(),
        email: Email::new("asha@example.com").unwrap(),
        mobile_number: PhoneNumber::new("9876543210").unwrap(),
        address: ShippingAddress {
            street: "1 Main Road".into(),
            city: "Pune".into(),
            state: "MH".into(),
            country: "India".into(),
            pin_code: "411001".into(),
        },
        book_id,
        quantity: Quantity::new(quantity).unwrap(),
        price: Price::new(250.0).unwrap(),
        condition: BookCondition::New,
        payment_type: Some("UPI".into()),
        status,
        gateway_order_id: None,
        receipt: None,
        amount: None,
        currency: "INR".into(),
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn rename_rewrites_descendant_and_book_paths() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let school = add_category(&repo, "School", "school", None, 10.0);
    let class = add_category(&repo, "Class 10", "school/class-10", Some(school.id), 0.0);
    add_category(&repo, "Maths", "school/class-10/maths", Some(class.id), 0.0);
    add_category(&repo, "Schoolbags", "schoolbags", None, 0.0);
    add_book(&repo, "Algebra", "school/class-10/maths", 3);
    add_book(&repo, "Backpack Guide", "schoolbags", 1);

    let mut renamed = school.clone();
    renamed.name = CategoryName::new("Academics").unwrap();
    renamed.path = path("academics");
    let rewrite = repo
        .update_category(&renamed, &school.path)
        .expect("should rename");
    assert_eq!(rewrite.categories, 2);
    assert_eq!(rewrite.books, 1);

    let paths: Vec<String> = repo
        .list_categories()
        .unwrap()
        .into_iter()
        .map(|c| c.path.to_string())
        .collect();
    assert!(paths.contains(&"academics/class-10/maths".to_string()));
    assert!(paths.contains(&"schoolbags".to_string()));
    assert!(!paths.iter().any(|p| p.starts_with("school/")));

    let moved = repo
        .list_books(BookListQuery::new().under(path("academics")))
        .unwrap();
    assert_eq!(moved.len(), 1);
    assert_eq!(moved[0].category_path, path("academics/class-10/maths"));
}

#[test]
fn rename_onto_taken_path_conflicts_and_changes_nothing() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let fiction = add_category(&repo, "Fiction", "fiction", None, 0.0);
    add_category(&repo, "Poetry", "poetry", None, 0.0);
    add_book(&repo, "Dune", "fiction", 2);

    let mut renamed = fiction.clone();
    renamed.path = path("poetry");
    let result = repo.update_category(&renamed, &fiction.path);
    assert!(matches!(result, Err(RepositoryError::Conflict(_))));

    let kept = repo.get_category_by_path(&fiction.path).unwrap();
    assert!(kept.is_some());
    let books = repo
        .list_books(BookListQuery::new().under(path("fiction")))
        .unwrap();
    assert_eq!(books.len(), 1);
}

#[test]
fn delete_subtree_removes_descendants_and_their_books_only() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let school = add_category(&repo, "School", "school", None, 0.0);
    let class = add_category(&repo, "Class 10", "school/class-10", Some(school.id), 0.0);
    add_category(&repo, "Maths", "school/class-10/maths", Some(class.id), 0.0);
    add_category(&repo, "Schoolbags", "schoolbags", None, 0.0);
    add_book(&repo, "Algebra", "school/class-10/maths", 3);
    add_book(&repo, "Reader", "school", 1);
    add_book(&repo, "Backpack Guide", "schoolbags", 1);

    let deleted = repo
        .delete_category_subtree(&school.path)
        .expect("should delete subtree");
    assert_eq!(deleted.categories, 3);
    assert_eq!(deleted.books, 2);

    let remaining = repo.list_categories().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].path, path("schoolbags"));
    assert_eq!(repo.list_books(BookListQuery::new()).unwrap().len(), 1);

    assert!(matches!(
        repo.delete_category_subtree(&school.path),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn duplicate_category_path_is_a_conflict() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    add_category(&repo, "Fiction", "fiction", None, 0.0);
    let now = Utc::now().naive_utc();
    let duplicate = repo.create_category(&NewCategory {
        name: CategoryName::new("FICTION").unwrap(),
        path: path("fiction"),
        parent_id: None,
        tags: vec![],
        seo_title: None,
        seo_description: None,
        discount: DiscountPercent::ZERO,
        created_at: now,
        updated_at: now,
    });
    assert!(matches!(duplicate, Err(RepositoryError::Conflict(_))));
}

#[test]
fn placing_and_cancelling_orders_moves_stock() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    add_category(&repo, "Fiction", "fiction", None, 0.0);
    let book_id = add_book(&repo, "Dune", "fiction", 3);

    let too_many = repo.place_order(&order_for(book_id, 5, OrderStatus::Shipped));
    assert!(matches!(
        too_many,
        Err(RepositoryError::InsufficientStock { available: 3 })
    ));

    let order = repo
        .place_order(&order_for(book_id, 2, OrderStatus::Shipped))
        .expect("should place order");
    let stock = |repo: &DieselRepository| {
        repo.get_book_by_id(book_id)
            .unwrap()
            .unwrap()
            .quantity_new
            .get()
    };
    assert_eq!(stock(&repo), 1);

    assert_eq!(repo.cancel_order(order.id, "Changed my mind").unwrap(), 1);
    assert_eq!(stock(&repo), 3);
    let cancelled = repo.get_order_by_id(order.id).unwrap().unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.cancel_reason.as_deref(), Some("Changed my mind"));

    let listed = repo
        .list_orders(OrderListQuery::new().email(Email::new("asha@example.com").unwrap()))
        .unwrap();
    assert_eq!(listed.len(), 1);
}

#[test]
fn admin_cancel_then_delete_restores_stock_once() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    add_category(&repo, "Fiction", "fiction", None, 0.0);
    let book_id = add_book(&repo, "Dune", "fiction", 3);
    let stock = |repo: &DieselRepository| {
        repo.get_book_by_id(book_id)
            .unwrap()
            .unwrap()
            .quantity_new
            .get()
    };

    let order = repo
        .place_order(&order_for(book_id, 2, OrderStatus::Shipped))
        .unwrap();
    assert_eq!(stock(&repo), 1);

    assert_eq!(
        repo.update_order_status(order.id, OrderStatus::Cancelled)
            .unwrap(),
        1
    );
    assert_eq!(stock(&repo), 3);

    assert_eq!(repo.delete_order(order.id).unwrap(), 1);
    assert_eq!(stock(&repo), 3);
}

#[test]
fn reopening_a_cancelled_order_reserves_stock_again() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    add_category(&repo, "Fiction", "fiction", None, 0.0);
    let book_id = add_book(&repo, "Dune", "fiction", 3);

    let first = repo
        .place_order(&order_for(book_id, 2, OrderStatus::Shipped))
        .unwrap();
    repo.update_order_status(first.id, OrderStatus::Cancelled)
        .unwrap();
    repo.place_order(&order_for(book_id, 2, OrderStatus::Shipped))
        .unwrap();

    assert!(matches!(
        repo.update_order_status(first.id, OrderStatus::Shipped),
        Err(RepositoryError::InsufficientStock { available: 1 })
    ));
    let unchanged = repo.get_order_by_id(first.id).unwrap().unwrap();
    assert_eq!(unchanged.status, OrderStatus::Cancelled);

    repo.update_order_status(first.id, OrderStatus::Delivered)
        .unwrap_err();
    let book = repo.get_book_by_id(book_id).unwrap().unwrap();
    assert_eq!(book.quantity_new.get(), 1);
}

#[test]
fn gateway_payments_are_recorded_against_the_order() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    add_category(&repo, "Fiction", "fiction", None, 0.0);
    let book_id = add_book(&repo, "Dune", "fiction", 3);

    let mut pending = order_for(book_id, 1, OrderStatus::Created);
    pending.gateway_order_id = Some("order_abc".into());
    pending.amount = Some(25000);
    repo.create_gateway_order(&pending)
        .expect("should create gateway order");

    let payment = NewPayment {
        payment_id: "pay_1".into(),
        status: "captured".into(),
        method: Some("upi".into()),
    };
    let paid = repo
        .record_payment("order_abc", OrderStatus::Paid, Some("upi"), &payment)
        .unwrap()
        .expect("order should exist");
    assert_eq!(paid.status, OrderStatus::Paid);
    assert_eq!(paid.payments.len(), 1);
    assert_eq!(paid.payments[0].payment_id, "pay_1");

    assert_eq!(
        repo.record_payment("order_missing", OrderStatus::Paid, None, &payment)
            .unwrap(),
        None
    );
    let found = repo.get_order_by_gateway_id("order_abc").unwrap().unwrap();
    assert_eq!(found.id, paid.id);
}

#[test]
fn subscriber_emails_are_unique() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let now = Utc::now().naive_utc();
    let subscriber = NewSubscriber {
        name: PersonName::new("Meera").unwrap(),
        email: Email::new("meera@example.com").unwrap(),
        status: SubscriberStatus::Active,
        notifications: NotificationPreferences::default(),
        created_at: now,
        updated_at: now,
    };

    repo.create_subscriber(&subscriber).unwrap();
    assert!(matches!(
        repo.create_subscriber(&subscriber),
        Err(RepositoryError::Conflict(_))
    ));
    assert!(
        repo.get_subscriber_by_email(&subscriber.email)
            .unwrap()
            .is_some()
    );
}

#[test]
fn settings_record_is_a_singleton() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let now = Utc::now().naive_utc();
    let settings = NewSiteSettings {
        logo: None,
        title: "Bookstore".into(),
        meta_description: "Books".into(),
        meta_keywords: "books".into(),
        api_key: "Not set".into(),
        maintenance_mode: false,
        created_at: now,
        updated_at: now,
    };

    assert_eq!(repo.get_settings().unwrap(), None);
    repo.create_settings(&settings).unwrap();
    assert!(matches!(
        repo.create_settings(&settings),
        Err(RepositoryError::Conflict(_))
    ));
    assert_eq!(repo.delete_settings().unwrap(), 1);
    assert_eq!(repo.get_settings().unwrap(), None);
}
