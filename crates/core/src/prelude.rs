//! Vetshop prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    boosters::{complete_previous, find_previous_dose, requires_chain},
    cart::{
        BoundClient, CartError, CartLine, CartSession, CartStorage, CartStore, JsonFileStorage,
        LineId, LineItem, LineMetadata, MemoryStorage, SourceRef, StorageError,
    },
    eligibility::{MaterializedSelection, Selection, eligible_appointments, eligible_vaccinations},
    ids::{
        AppointmentId, ClientId, EmployeeId, InvoiceId, PetId, ProductId, ServiceId, TypedId,
        VaccinationId,
    },
    invoice::{
        InvoiceDetail, InvoiceDraft, InvoiceError, InvoiceTotals, InvoiceTracking, ManualDetail,
        NewInvoice, compute_totals,
    },
    pricing::{Percent, PercentError, line_total},
    records::{
        appointments::{Appointment, AppointmentInvoiceData, AppointmentStatus},
        catalog::{Client, Employee, Pet, Product, Service},
        invoices::{Invoice, InvoiceStatus},
        vaccinations::{
            BoosterDose, NewVaccination, Vaccination, VaccinationInvoiceData, VaccinationUpdate,
        },
    },
};
