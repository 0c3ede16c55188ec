use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Users
    create_indexes(
        db,
        "users",
        vec![
            index_unique(bson::doc! { "email": 1 }),
            index(bson::doc! { "role": 1 }),
        ],
    )
    .await?;

    // Offers
    create_indexes(
        db,
        "offers",
        vec![
            index_unique(bson::doc! { "slug": 1 }),
            index_unique(bson::doc! { "code": 1 }),
            index(bson::doc! { "status": 1, "offer_type": 1 }),
            index(bson::doc! { "status": 1, "destination": 1 }),
        ],
    )
    .await?;

    // Bookings
    create_indexes(
        db,
        "bookings",
        vec![
            index_unique(bson::doc! { "booking_number": 1 }),
            index(bson::doc! { "offer_id": 1 }),
            index(bson::doc! { "status": 1, "created_at": -1 }),
            index(bson::doc! { "contact.email": 1 }),
        ],
    )
    .await?;

    // Notifications
    create_indexes(
        db,
        "notifications",
        vec![
            index(bson::doc! { "user_id": 1, "created_at": -1 }),
            index(bson::doc! { "user_id": 1, "is_read": 1 }),
        ],
    )
    .await?;

    // Hotels
    create_indexes(
        db,
        "hotels",
        vec![
            index_unique(bson::doc! { "slug": 1 }),
            index(bson::doc! { "city": 1, "is_active": 1 }),
            index(bson::doc! { "supplier_id": 1 }),
        ],
    )
    .await?;

    // Flights
    create_indexes(
        db,
        "flights",
        vec![
            index(bson::doc! { "flight_number": 1 }),
            index(bson::doc! { "route.from": 1, "route.to": 1, "is_active": 1 }),
            index(bson::doc! { "supplier_id": 1 }),
        ],
    )
    .await?;

    // Transports
    create_indexes(
        db,
        "transports",
        vec![
            index(bson::doc! { "transport_type": 1, "is_active": 1 }),
            index(bson::doc! { "supplier_id": 1 }),
        ],
    )
    .await?;

    // Suppliers
    create_indexes(
        db,
        "suppliers",
        vec![index_unique(bson::doc! { "code": 1 })],
    )
    .await?;

    info!("MongoDB indexes ensured");
    Ok(())
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}
