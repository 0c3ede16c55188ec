use mongodb::Database;
use std::sync::Arc;
use tripdesk_config::Settings;
use tripdesk_services::{
    AuthService, NotificationService,
    dao::{
        booking::BookingDao, flight::FlightDao, hotel::HotelDao, notification::NotificationDao,
        offer::OfferDao, supplier::SupplierDao, transport::TransportDao, user::UserDao,
    },
    notify::{EmailSender, FcmClient, HttpEmailClient, PushSender},
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserDao>,
    pub offers: Arc<OfferDao>,
    pub bookings: Arc<BookingDao>,
    pub hotels: Arc<HotelDao>,
    pub flights: Arc<FlightDao>,
    pub transports: Arc<TransportDao>,
    pub suppliers: Arc<SupplierDao>,
    pub notifications: Arc<NotificationDao>,
    pub notifier: Arc<NotificationService>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        let push = Arc::new(FcmClient::new(settings.push.clone()));
        let email = Arc::new(HttpEmailClient::new(settings.email.clone()));
        Self::with_senders(db, settings, push, email)
    }

    /// Wiring point for tests to substitute push/email transports.
    pub fn with_senders(
        db: Database,
        settings: Settings,
        push: Arc<dyn PushSender>,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        let auth = Arc::new(AuthService::new(settings.jwt.clone()));
        let users = Arc::new(UserDao::new(&db));
        let offers = Arc::new(OfferDao::new(&db));
        let bookings = Arc::new(BookingDao::new(&db));
        let hotels = Arc::new(HotelDao::new(&db));
        let flights = Arc::new(FlightDao::new(&db));
        let transports = Arc::new(TransportDao::new(&db));
        let suppliers = Arc::new(SupplierDao::new(&db));
        let notifications = Arc::new(NotificationDao::new(&db));
        let notifier = Arc::new(NotificationService::new(
            Arc::clone(&notifications),
            Arc::clone(&users),
            push,
            email,
            settings.push.enabled,
            settings.email.enabled,
            settings.app.base_url.clone(),
        ));

        Self {
            db,
            settings,
            auth,
            users,
            offers,
            bookings,
            hotels,
            flights,
            transports,
            suppliers,
            notifications,
            notifier,
        }
    }
}
