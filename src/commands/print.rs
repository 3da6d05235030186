use crate::cli::{ChangeFilter, PrintArgs};
use crate::fs::default_fs;
use crate::module::parse_module;
use crate::style;

use super::{CommandContext, Report, write_report};

pub fn cmd_print(args: PrintArgs) -> i32 {
    let fs = default_fs();
    let ctx = match CommandContext::new(&args.path, fs) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let interface = match parse_module(&ctx.path, fs) {
        Ok(interface) => interface,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };

    match write_report(
        &Report::Interface(&interface),
        args.format,
        ChangeFilter::Any,
        args.output.as_deref(),
        fs,
    ) {
        Ok(()) => 0,
        Err(code) => code,
    }
}
