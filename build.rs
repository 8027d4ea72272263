// FBGL
// copyright zipxing@hotmail.com 2022～2025

// cfg aliases shared by the library and the tools

fn main() {
    use cfg_aliases::cfg_aliases;

    cfg_aliases! {
        // Platform aliases
        linux_fb: { target_os = "linux" },

        // Terminal input and the run loop need crossterm
        term_input: { feature = "crossterm" },

        // No device, no shared memory: only the in-memory surface
        headless: { not(linux_fb) },
    }
}
