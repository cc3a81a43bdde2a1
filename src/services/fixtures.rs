//! Row constructors for unit tests. Every optional column starts empty.

use time::OffsetDateTime;
use uuid::Uuid;

use super::booking::BookingRow;
use super::driver::DriverRow;
use super::laundromat::LaundromatRow;
use super::machine::MachineRow;
use super::participating::ParticipatingLaundromatRow;
use super::product::Product;
use super::supply_order::SupplyOrderRow;
use super::user::UserRow;

const EPOCH: OffsetDateTime = OffsetDateTime::UNIX_EPOCH;

#[must_use]
pub fn laundromat(id: &str, name: &str) -> LaundromatRow {
    LaundromatRow {
        id: Uuid::new_v4(),
        laundromat_id: id.into(),
        place_id: None,
        neighborhood: None,
        name: name.into(),
        latitude: None,
        longitude: None,
        rating: None,
        total_user_ratings: None,
        address: None,
        phone: None,
        hours_of_operation: None,
        accessible: None,
        photo_reference: None,
        google_maps_url: None,
        top_review_text: None,
        top_review_rating: None,
        top_review_author: None,
        original_query: None,
        borough: None,
        created_at: EPOCH,
        updated_at: EPOCH,
    }
}

#[must_use]
pub fn participating(id: &str, name: &str, borough: Option<&str>, rating: Option<f64>) -> ParticipatingLaundromatRow {
    ParticipatingLaundromatRow {
        id: Uuid::new_v4(),
        laundromat_id: id.into(),
        name: name.into(),
        address: None,
        phone_number: None,
        hours_of_operation: None,
        contact_person: None,
        contact_email: None,
        borough: borough.map(Into::into),
        rating,
        onboarding_date: None,
        contract_status: None,
        payment_terms: None,
        commission_rate: None,
        average_monthly_revenue: None,
        last_revenue_update: None,
        admin_notes: None,
        created_at: EPOCH,
        updated_at: EPOCH,
    }
}

#[must_use]
pub fn machine(id: &str, laundromat_id: &str, machine_type: &str, status: Option<&str>) -> MachineRow {
    MachineRow {
        id: Uuid::new_v4(),
        machine_id: id.into(),
        laundromat_id: laundromat_id.into(),
        machine_type: machine_type.into(),
        status: status.map(Into::into),
        last_maintenance: None,
        usage_percentage: None,
        onboarding_date: None,
        contract_status: None,
        payment_terms: None,
        commission_rate: None,
        average_monthly_revenue: None,
        last_revenue_update: None,
        admin_notes: None,
        created_at: EPOCH,
        updated_at: EPOCH,
    }
}

#[must_use]
pub fn driver(name: &str, status: Option<&str>, is_active: Option<bool>) -> DriverRow {
    DriverRow {
        id: Uuid::new_v4(),
        driver_id: Uuid::new_v4().to_string(),
        full_name: name.into(),
        email: format!("{}@example.test", name.to_lowercase().replace(' ', ".")),
        phone_number: "555-0100".into(),
        vehicle_type: None,
        license_plate: None,
        current_status: status.map(Into::into),
        is_active,
        date_registered: None,
        last_status_update: None,
        admin_notes: None,
        created_at: EPOCH,
        updated_at: EPOCH,
    }
}

#[must_use]
pub fn user(name: &str, account_status: Option<&str>) -> UserRow {
    UserRow {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4().to_string(),
        phone_number: None,
        pin_hash: Some(super::user::hash_pin("1234")),
        full_name: name.into(),
        email: None,
        default_pickup_address_street: None,
        default_pickup_address_city: None,
        default_pickup_address_state: None,
        default_pickup_address_zip: None,
        default_delivery_address_street: None,
        default_delivery_address_city: None,
        default_delivery_address_state: None,
        default_delivery_address_zip: None,
        preferred_laundromat_id: None,
        user_role: None,
        account_status: account_status.map(Into::into),
        date_registered: None,
        last_login_timestamp: None,
        admin_notes_user: None,
        created_at: EPOCH,
        updated_at: EPOCH,
    }
}

#[must_use]
pub fn booking(id: &str, status: Option<&str>, created: Option<OffsetDateTime>) -> BookingRow {
    BookingRow {
        id: Uuid::new_v4(),
        booking_id: id.into(),
        user_id: "U1".into(),
        user_full_name_snapshot: None,
        user_phone_snapshot: None,
        participating_laundromat_id: None,
        laundromat_name_snapshot: None,
        service_type_id: None,
        service_name_snapshot: None,
        service_category_id_snapshot: None,
        booking_creation_timestamp: created,
        current_booking_status: status.map(Into::into),
        estimated_cost: None,
        actual_cost: None,
        payment_status: None,
        last_status_update_timestamp: None,
        created_at: EPOCH,
        updated_at: EPOCH,
    }
}

#[must_use]
pub fn supply_order(id: &str, status: Option<&str>, total: Option<f64>) -> SupplyOrderRow {
    SupplyOrderRow {
        id: Uuid::new_v4(),
        supply_order_id: id.into(),
        user_id: "U1".into(),
        user_full_name_snapshot: None,
        order_timestamp: None,
        delivery_address_street: None,
        delivery_address_city: None,
        delivery_address_state: None,
        delivery_address_zip: None,
        subtotal_amount: None,
        total_order_amount: total,
        order_status: status.map(Into::into),
        payment_status: None,
        payment_method_snapshot: None,
        last_updated_timestamp: None,
        created_at: EPOCH,
        updated_at: EPOCH,
    }
}

#[must_use]
pub fn product(id: &str, title: &str, price: &str) -> Product {
    Product {
        api_product_id: id.into(),
        product_title: title.into(),
        brand: None,
        price: Some(price.into()),
        description_snippet: None,
        main_image_url: None,
        product_page_url: None,
        stock: None,
    }
}
