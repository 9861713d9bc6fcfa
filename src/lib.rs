pub mod configuration;
pub mod logging;
pub mod plannererror;

pub mod calendar {
    pub mod region;
    pub mod holidayrecord;
    pub mod catalogerror;
    pub mod holidaycalendar;
    pub mod holidaycatalog;
    pub mod holidaytemplate;
    pub mod catalogeditor;
}

pub mod ledger {
    pub mod selectionerror;
    pub mod vacationselection;
    pub mod vacationledger;
}

pub mod persistence {
    pub mod atomicfile;
    pub mod persistenceerror;
    pub mod selectionstore;
}

pub mod service {
    pub mod plannerservice;
}

pub mod time {
    pub mod rangeofdates;
}
