mod check_config;
mod list;
mod run;

pub(crate) use check_config::cmd_check_config;
pub(crate) use list::cmd_list;
pub(crate) use run::{cmd_run, RunArgs};
