pub mod entity {
    pub mod appointment;
    pub mod business_hours;
    pub mod datetime;
    pub mod error;
    pub mod slot_planner;
    pub mod time_slot;
    pub mod tour;
}

pub mod application {
    pub mod book_appointment;
    pub mod interface;
    pub mod list_available_slots;
}

pub mod adapter {
    pub mod gateway {
        pub mod business_hours_repository;
        pub mod json_lines_submitter;
        pub mod yaml;
    }
}
