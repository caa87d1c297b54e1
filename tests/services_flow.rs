use tera::Tera;

use canteen_orders::domain::auth::Role;
use canteen_orders::forms::orders::{
    ChangeStatusForm, CreateOrderForm, DecideItemForm, OrderItemForm,
};
use canteen_orders::invoice::{INVOICE_TEMPLATE, InvoiceStore, LocalInvoiceStore};
use canteen_orders::repository::DieselRepository;
use canteen_orders::services::orders::{self, OrderQuery};
use canteen_orders::services::{ServiceError, invoices};

mod common;

use common::{STATUS_FULFILLED, STATUS_IN_PROGRESS};

fn invoice_templates() -> Tera {
    let mut tera = Tera::default();
    tera.add_raw_template(INVOICE_TEMPLATE, include_str!("../templates/invoice.xml"))
        .expect("invoice template");
    tera
}

#[test]
fn test_order_from_creation_to_invoice() {
    let test_db = common::TestDb::new("test_order_from_creation_to_invoice.db");
    let repo = DieselRepository::new(test_db.pool());

    let school = common::canteen(&repo, "School 4, Sadovaya 12");
    let kitchen = common::canteen(&repo, "Central kitchen, Zavodskaya 1");
    let admin = common::session(&common::employee(&repo, "+70000000901", Role::Admin, None));
    let cook = common::session(&common::employee(
        &repo,
        "+70000000902",
        Role::User,
        Some(school.id),
    ));
    let chef = common::session(&common::employee(
        &repo,
        "+70000000903",
        Role::User,
        Some(kitchen.id),
    ));
    let stranger = common::session(&common::employee(
        &repo,
        "+70000000904",
        Role::User,
        None,
    ));
    let beets = common::product(&repo, "Beets", 2500);
    let carrots = common::product(&repo, "Carrots", 3000);

    let order = orders::create_order(
        &repo,
        &cook,
        CreateOrderForm {
            customer_canteen_id: None,
            executor_canteen_id: kitchen.id,
            items: vec![
                OrderItemForm {
                    product_id: beets.id,
                    quantity: 4,
                },
                OrderItemForm {
                    product_id: carrots.id,
                    quantity: 2,
                },
            ],
        },
    )
    .expect("create order");
    assert_eq!(order.customer_canteen_id, school.id);
    assert_eq!(order.total_cents, 16000);

    let page = orders::list_orders(&repo, &chef, OrderQuery::default()).unwrap();
    assert_eq!(page.orders.items.len(), 1);
    assert_eq!(page.unviewed, vec![order.id]);

    orders::get_order(&repo, &chef, order.id).unwrap();
    let page = orders::list_orders(&repo, &chef, OrderQuery::default()).unwrap();
    assert!(page.unviewed.is_empty());

    assert!(matches!(
        orders::get_order(&repo, &stranger, order.id),
        Err(ServiceError::NotFound)
    ));

    // Only the executor side decides items.
    assert!(matches!(
        orders::decide_order_item(
            &repo,
            &cook,
            order.id,
            order.items[0].id,
            DecideItemForm { accepted: true }
        ),
        Err(ServiceError::Unauthorized)
    ));
    orders::decide_order_item(
        &repo,
        &chef,
        order.id,
        order.items[0].id,
        DecideItemForm { accepted: true },
    )
    .unwrap();

    assert!(matches!(
        orders::change_order_status(
            &repo,
            &admin,
            order.id,
            ChangeStatusForm {
                status_id: STATUS_FULFILLED
            }
        ),
        Err(ServiceError::Precondition(_))
    ));

    orders::decide_order_item(
        &repo,
        &chef,
        order.id,
        order.items[1].id,
        DecideItemForm { accepted: false },
    )
    .unwrap();

    let store_dir = tempfile::tempdir().expect("temp dir");
    let store = LocalInvoiceStore::new(store_dir.path());
    let tera = invoice_templates();

    orders::change_order_status(
        &repo,
        &admin,
        order.id,
        ChangeStatusForm {
            status_id: STATUS_IN_PROGRESS,
        },
    )
    .unwrap();

    assert!(matches!(
        invoices::export_invoice(&repo, &store, &tera, &admin, order.id),
        Err(ServiceError::Precondition(_))
    ));

    orders::change_order_status(
        &repo,
        &admin,
        order.id,
        ChangeStatusForm {
            status_id: STATUS_FULFILLED,
        },
    )
    .unwrap();

    let history = orders::load_order_history(&repo, &cook, order.id).unwrap();
    assert_eq!(history.len(), 2);

    let receipt = invoices::export_invoice(&repo, &store, &tera, &chef, order.id)
        .expect("export invoice");
    assert!(receipt.pdf_size > 0);

    let xml = store.get(&receipt.xml_key).expect("stored xml");
    let xml = String::from_utf8(xml).expect("utf-8 xml");
    assert!(xml.contains("Beets"));
    assert!(!xml.contains("Carrots"));
    assert!(xml.contains("School 4, Sadovaya 12"));

    let pdf = invoices::fetch_invoice(&repo, &store, &cook, order.id).expect("fetch pdf");
    assert!(pdf.starts_with(b"%PDF"));

    assert!(matches!(
        invoices::fetch_invoice(&repo, &store, &stranger, order.id),
        Err(ServiceError::NotFound)
    ));

    // Fulfilled orders are frozen for item decisions.
    assert!(matches!(
        orders::decide_order_item(
            &repo,
            &chef,
            order.id,
            order.items[1].id,
            DecideItemForm { accepted: true }
        ),
        Err(ServiceError::Precondition(_))
    ));
}
