use crate::runtime::interpreter::Machine;

/// The core word set, grouped by concern.
pub mod base_words;

/// Register every built-in word with the machine.  Called once at boot
/// before the string cache is sealed.
pub fn register_all(machine: &mut Machine) {
    base_words::stack_words::register_stack_words(machine);
    base_words::arithmetic_words::register_arithmetic_words(machine);
    base_words::memory_words::register_memory_words(machine);
    base_words::control_words::register_control_words(machine);
    base_words::compiler_words::register_compiler_words(machine);
    base_words::format_words::register_format_words(machine);
    base_words::io_words::register_io_words(machine);
    base_words::tool_words::register_tool_words(machine);
}
