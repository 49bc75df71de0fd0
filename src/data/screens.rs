//! List screens of the dashboard and their view defaults
//!
//! Each screen used to hard-code which fields its search box looks at, which
//! filter selects it offers and how it sorts on first load. Those choices
//! live here as data so every screen can share `compute_view`.

use crate::data::query::{FieldFilter, QueryParams, SortDirection, ALL_SENTINEL};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    Classes,
    Members,
    Payments,
    PaymentTypes,
    Transactions,
    Facilities,
    Equipment,
    Trainers,
    Attendance,
}

/// Static description of one list screen
#[derive(Debug, Clone, Copy)]
pub struct ScreenPreset {
    pub kind: CollectionKind,
    pub title: &'static str,
    /// Columns shown in the table, in order
    pub columns: &'static [&'static str],
    /// Fields the search box matches against
    pub search_fields: &'static [&'static str],
    /// Filter selects compared case-insensitively
    pub category_fields: &'static [&'static str],
    /// Fields whose numeric-looking strings are loaded as numbers
    pub numeric_fields: &'static [&'static str],
    pub default_sort: &'static str,
    pub default_direction: SortDirection,
    /// Alternate spellings seen in payloads, mapped to the canonical field
    pub aliases: &'static [(&'static str, &'static str)],
    /// Display names assembled from parts: (target, first, last)
    pub derived_names: &'static [(&'static str, &'static str, &'static str)],
}

const CLASSES: ScreenPreset = ScreenPreset {
    kind: CollectionKind::Classes,
    title: "Classes",
    columns: &["name", "instructor", "schedule", "capacity", "status", "startDate"],
    search_fields: &["name", "instructor", "description"],
    category_fields: &["status", "level"],
    numeric_fields: &["capacity", "enrolled"],
    default_sort: "name",
    default_direction: SortDirection::Ascending,
    aliases: &[
        ("className", "name"),
        ("title", "name"),
        ("trainerName", "instructor"),
        ("trainer.name", "instructor"),
        ("maxCapacity", "capacity"),
    ],
    derived_names: &[("instructor", "trainer.firstName", "trainer.lastName")],
};

const MEMBERS: ScreenPreset = ScreenPreset {
    kind: CollectionKind::Members,
    title: "Members",
    columns: &[
        "fullName",
        "email",
        "phone",
        "membershipType",
        "status",
        "joinDate",
    ],
    search_fields: &["fullName", "firstName", "lastName", "email", "phone"],
    category_fields: &["status", "membershipType"],
    numeric_fields: &[],
    default_sort: "lastName",
    default_direction: SortDirection::Ascending,
    aliases: &[
        ("fname", "firstName"),
        ("lname", "lastName"),
        ("emailAddress", "email"),
        ("phoneNumber", "phone"),
        ("membership", "membershipType"),
        ("joinedAt", "joinDate"),
        ("joinedDate", "joinDate"),
    ],
    derived_names: &[("fullName", "firstName", "lastName")],
};

const PAYMENTS: ScreenPreset = ScreenPreset {
    kind: CollectionKind::Payments,
    title: "Payments",
    columns: &["memberName", "amount", "paymentMethod", "status", "paymentDate"],
    search_fields: &["memberName", "paymentMethod", "reference"],
    category_fields: &["status", "paymentMethod"],
    numeric_fields: &["amount"],
    default_sort: "paymentDate",
    default_direction: SortDirection::Descending,
    aliases: &[
        ("method", "paymentMethod"),
        ("date", "paymentDate"),
        ("paidAt", "paymentDate"),
        ("member.name", "memberName"),
        ("member.fullName", "memberName"),
    ],
    derived_names: &[("memberName", "member.firstName", "member.lastName")],
};

const PAYMENT_TYPES: ScreenPreset = ScreenPreset {
    kind: CollectionKind::PaymentTypes,
    title: "Payment Types",
    columns: &["name", "description", "amount", "durationDays", "status"],
    search_fields: &["name", "description"],
    category_fields: &["status"],
    numeric_fields: &["amount", "durationDays"],
    default_sort: "name",
    default_direction: SortDirection::Ascending,
    aliases: &[
        ("typeName", "name"),
        ("price", "amount"),
        ("duration", "durationDays"),
    ],
    derived_names: &[],
};

const TRANSACTIONS: ScreenPreset = ScreenPreset {
    kind: CollectionKind::Transactions,
    title: "Transactions",
    columns: &[
        "reference",
        "memberName",
        "type",
        "amount",
        "status",
        "transactionDate",
    ],
    search_fields: &["reference", "memberName", "description"],
    category_fields: &["status", "type"],
    numeric_fields: &["amount"],
    default_sort: "transactionDate",
    default_direction: SortDirection::Descending,
    aliases: &[
        ("transactionId", "reference"),
        ("transactionType", "type"),
        ("date", "transactionDate"),
        ("createdAt", "transactionDate"),
        ("member.name", "memberName"),
    ],
    derived_names: &[("memberName", "member.firstName", "member.lastName")],
};

const FACILITIES: ScreenPreset = ScreenPreset {
    kind: CollectionKind::Facilities,
    title: "Facilities",
    columns: &["name", "location", "type", "capacity", "status"],
    search_fields: &["name", "location", "type"],
    category_fields: &["status", "type"],
    numeric_fields: &["capacity"],
    default_sort: "name",
    default_direction: SortDirection::Ascending,
    aliases: &[("facilityName", "name"), ("facilityType", "type")],
    derived_names: &[],
};

const EQUIPMENT: ScreenPreset = ScreenPreset {
    kind: CollectionKind::Equipment,
    title: "Equipment",
    columns: &[
        "name",
        "category",
        "facility",
        "quantity",
        "status",
        "purchaseDate",
    ],
    search_fields: &["name", "category", "serialNumber"],
    category_fields: &["status", "category"],
    numeric_fields: &["quantity"],
    default_sort: "name",
    default_direction: SortDirection::Ascending,
    aliases: &[
        ("equipmentName", "name"),
        ("facilityName", "facility"),
        ("facility.name", "facility"),
        ("qty", "quantity"),
    ],
    derived_names: &[],
};

const TRAINERS: ScreenPreset = ScreenPreset {
    kind: CollectionKind::Trainers,
    title: "Trainers",
    columns: &[
        "fullName",
        "specialization",
        "email",
        "phone",
        "status",
        "hireDate",
    ],
    search_fields: &["fullName", "firstName", "lastName", "specialization", "email"],
    category_fields: &["status", "specialization"],
    numeric_fields: &[],
    default_sort: "lastName",
    default_direction: SortDirection::Ascending,
    aliases: &[
        ("fname", "firstName"),
        ("lname", "lastName"),
        ("specialty", "specialization"),
        ("hiredAt", "hireDate"),
    ],
    derived_names: &[("fullName", "firstName", "lastName")],
};

const ATTENDANCE: ScreenPreset = ScreenPreset {
    kind: CollectionKind::Attendance,
    title: "Attendance",
    columns: &["memberName", "className", "checkInTime", "checkOutTime", "status"],
    search_fields: &["memberName", "className"],
    category_fields: &["status"],
    numeric_fields: &[],
    default_sort: "checkInTime",
    default_direction: SortDirection::Descending,
    aliases: &[
        ("member.name", "memberName"),
        ("class.name", "className"),
        ("checkIn", "checkInTime"),
        ("checkOut", "checkOutTime"),
        ("date", "checkInTime"),
    ],
    derived_names: &[("memberName", "member.firstName", "member.lastName")],
};

impl CollectionKind {
    pub const ALL: [CollectionKind; 9] = [
        CollectionKind::Classes,
        CollectionKind::Members,
        CollectionKind::Payments,
        CollectionKind::PaymentTypes,
        CollectionKind::Transactions,
        CollectionKind::Facilities,
        CollectionKind::Equipment,
        CollectionKind::Trainers,
        CollectionKind::Attendance,
    ];

    pub fn preset(self) -> &'static ScreenPreset {
        match self {
            CollectionKind::Classes => &CLASSES,
            CollectionKind::Members => &MEMBERS,
            CollectionKind::Payments => &PAYMENTS,
            CollectionKind::PaymentTypes => &PAYMENT_TYPES,
            CollectionKind::Transactions => &TRANSACTIONS,
            CollectionKind::Facilities => &FACILITIES,
            CollectionKind::Equipment => &EQUIPMENT,
            CollectionKind::Trainers => &TRAINERS,
            CollectionKind::Attendance => &ATTENDANCE,
        }
    }

    /// Key used by REST envelopes and on the command line
    pub fn key(self) -> &'static str {
        match self {
            CollectionKind::Classes => "classes",
            CollectionKind::Members => "members",
            CollectionKind::Payments => "payments",
            CollectionKind::PaymentTypes => "payment_types",
            CollectionKind::Transactions => "transactions",
            CollectionKind::Facilities => "facilities",
            CollectionKind::Equipment => "equipment",
            CollectionKind::Trainers => "trainers",
            CollectionKind::Attendance => "attendance",
        }
    }
}

impl FromStr for CollectionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_ascii_lowercase().replace('-', "_");
        CollectionKind::ALL
            .into_iter()
            .find(|kind| kind.key() == wanted || kind.key().trim_end_matches('s') == wanted)
            .ok_or_else(|| anyhow!("Unknown screen '{}'", s))
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.preset().title)
    }
}

impl ScreenPreset {
    pub fn is_category_field(&self, field: &str) -> bool {
        self.category_fields.contains(&field)
    }

    /// Filter for a select value: category fields ignore case, others match exactly
    pub fn filter_for(&self, field: &str, value: &str) -> FieldFilter {
        if self.is_category_field(field) {
            FieldFilter::category(value)
        } else {
            FieldFilter::from_select(value)
        }
    }

    /// Query state of a freshly opened screen: no search, every select on "all"
    pub fn initial_params(&self, page_size: usize) -> QueryParams {
        let mut params = QueryParams::new()
            .with_search("", self.search_fields.iter().copied())
            .with_sort(self.default_sort, self.default_direction)
            .with_page(1, page_size);

        for field in self.category_fields {
            params = params.with_filter(*field, self.filter_for(field, ALL_SENTINEL));
        }

        params
    }
}
