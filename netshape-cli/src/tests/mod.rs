//! Shared test harness modules for the netshape CLI.

use super::*;
