// Application layer: dispatch of the `wlaio` subcommands onto the core modules.

pub mod commands;
