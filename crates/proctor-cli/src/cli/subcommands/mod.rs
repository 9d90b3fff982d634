mod attendance;
mod hall;
mod qr;
mod schedule;
mod student;
mod ticket;

pub use attendance::AttendanceCommands;
pub use hall::HallCommands;
pub use qr::QrCommands;
pub use schedule::{ScheduleCommands, ScheduleCreateArgs};
pub use student::StudentCommands;
pub use ticket::TicketCommands;
