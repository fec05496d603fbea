use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Deref;

use crate::transaction::{Transaction, TransactionTable};

/// The values chosen in each of the three filter inputs
///
/// An empty set is a valid selection that matches nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub cities: BTreeSet<String>,
    pub customer_types: BTreeSet<String>,
    pub genders: BTreeSet<String>,
}

impl FilterSelection {
    /// Select every value present in the table, the initial state of the
    /// dashboard
    pub fn all(table: &TransactionTable) -> Self {
        FilterSelection {
            cities: table.cities().into_iter().collect(),
            customer_types: table.customer_types().into_iter().collect(),
            genders: table.genders().into_iter().collect(),
        }
    }

    /// Build a selection from any three collections of values
    ///
    /// # Arguments
    /// * `cities` - Cities to keep
    /// * `customer_types` - Customer types to keep
    /// * `genders` - Genders to keep
    pub fn new<C, T, G>(cities: C, customer_types: T, genders: G) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
        G: IntoIterator,
        G::Item: Into<String>,
    {
        FilterSelection {
            cities: cities.into_iter().map(Into::into).collect(),
            customer_types: customer_types.into_iter().map(Into::into).collect(),
            genders: genders.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a transaction passes all three inputs
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.cities.contains(&transaction.city)
            && self.customer_types.contains(&transaction.customer_type)
            && self.genders.contains(&transaction.gender)
    }

    /// Run [`filter`] with this selection
    pub fn apply<'a>(&self, table: &'a TransactionTable) -> FilteredView<'a> {
        filter(table, &self.cities, &self.customer_types, &self.genders)
    }
}

/// Rows of a [`TransactionTable`] that satisfy a selection, in table order
#[derive(Clone, Debug, Default)]
pub struct FilteredView<'a> {
    rows: Vec<&'a Transaction>,
}

impl<'a> FilteredView<'a> {
    pub fn rows(&self) -> &[&'a Transaction] {
        &self.rows
    }
}

impl<'a> Deref for FilteredView<'a> {
    type Target = [&'a Transaction];

    fn deref(&self) -> &Self::Target {
        &self.rows
    }
}

impl<'a> FromIterator<&'a Transaction> for FilteredView<'a> {
    fn from_iter<I: IntoIterator<Item = &'a Transaction>>(iter: I) -> Self {
        FilteredView {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Keep the rows whose city, customer type and gender are all selected
///
/// Order is preserved. Any empty set yields an empty view.
pub fn filter<'a>(
    table: &'a TransactionTable,
    cities: &BTreeSet<String>,
    customer_types: &BTreeSet<String>,
    genders: &BTreeSet<String>,
) -> FilteredView<'a> {
    table
        .rows()
        .iter()
        .filter(|t| {
            cities.contains(&t.city)
                && customer_types.contains(&t.customer_type)
                && genders.contains(&t.gender)
        })
        .collect()
}
