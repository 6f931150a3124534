#![allow(dead_code)]

use protocheck_harness::SuiteConfig;
use protocheck_sim::{InMemoryMailbox, InMemorySharePoint, ServerProfile};

fn parse(source: &str, origin: &str) -> SuiteConfig {
    SuiteConfig::from_toml_str(source, origin).unwrap()
}

fn common() -> SuiteConfig {
    parse(include_str!("../../../../config/common.toml"), "common.toml")
}

/// The shipped MS-OXWSCONT configuration.
pub fn contacts_config() -> SuiteConfig {
    common().layer(parse(
        include_str!("../../../../config/ms-oxwscont.toml"),
        "ms-oxwscont.toml",
    ))
}

/// The MS-OXWSCONT configuration for an Exchange 2010 server.
pub fn contacts_2010_config() -> SuiteConfig {
    contacts_config().layer(parse(
        include_str!("../../../../config/ms-oxwscont-2010.toml"),
        "ms-oxwscont-2010.toml",
    ))
}

/// The shipped MS-WEBSS configuration with its SHOULD/MAY flags.
pub fn webs_config() -> SuiteConfig {
    common()
        .layer(parse(
            include_str!("../../../../config/ms-webss.toml"),
            "ms-webss.toml",
        ))
        .merge_optional(parse(
            include_str!("../../../../config/ms-webss-should-may.toml"),
            "ms-webss-should-may.toml",
        ))
        .unwrap()
}

/// The MS-WEBSS configuration layered with the SharePoint 2013 profile.
pub fn webs_sp2013_config() -> SuiteConfig {
    webs_config().layer(parse(
        include_str!("../../../../config/ms-webss-sp2013.toml"),
        "ms-webss-sp2013.toml",
    ))
}

pub fn mailbox(profile: ServerProfile) -> InMemoryMailbox {
    InMemoryMailbox::new(&contacts_config(), profile).unwrap()
}

pub fn sharepoint(profile: ServerProfile) -> InMemorySharePoint {
    InMemorySharePoint::new(&webs_config(), profile).unwrap()
}
