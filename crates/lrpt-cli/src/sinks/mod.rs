/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! File-format-specific [`ImageSink`](lrpt_core::sink::ImageSink) implementations.
pub mod bmp;
pub mod raw;
