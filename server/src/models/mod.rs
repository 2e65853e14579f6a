pub mod destination;
pub mod notification;
pub mod ticket;
pub mod user;
pub mod voucher;

pub use destination::{Destination, DestinationUpdate, NewDestination};
pub use notification::{Notification, NotificationDraft};
pub use ticket::{NewTicket, OrderStatus, Ticket, TicketRow};
pub use user::User;
pub use voucher::{NewVoucher, Voucher};
