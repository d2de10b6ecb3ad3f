//! Handler for the catalog keyword listing.

use poolctl_attr::catalog;

use crate::output;

pub(crate) fn keywords() {
    for def in catalog::entries() {
        println!("{}", output::describe_definition(def));
    }
}
