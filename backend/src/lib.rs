/*
    Developer blog:
    - This started life as the Katana output dialog: pick a render node, pick a frame range,
      then either open a terminal running katana --batch or spool one farm job per node.
      The widgets are gone, what is left is the state the dialog held (OutputSession) and
      the code that turns that state into command lines and farm jobs (JobAssembler).
    - Farm and tracking system are behind traits (domains/) so the assembler can be
      exercised without an engine or a ShotGrid site.
    - Staged scene copies (.shot.katana next to the working file) are never cleaned up.
*/
pub mod cli;
pub mod config;
pub mod domains;
pub mod models;
pub mod services;
