// Copyright 2019 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

// Permission is hereby granted, free of charge, to any person obtaining a copy of this
// software and associated documentation files (the "Software"), to deal in the Software
// without restriction, including without limitation the rights to use, copy, modify,
// merge, publish, distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED,
// INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A
// PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT
// HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE
// SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
#[cfg(target_arch = "x86")]
use core::arch::x86::__cpuid;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::__cpuid;

#[derive(Copy, Clone, Debug)]
pub enum CpuManufacturer {
    Unknown,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Intel,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Amd,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InstructionSet {
    X86,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Ssse3,
}

// Leaf 1, ecx
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
const SSSE3_BIT: u32 = 1 << 9;
// Leaf 1, edx
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
const SSE2_BIT: u32 = 1 << 26;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
const fn four_cc(name: &[u8; 12], first: usize) -> u32 {
    u32::from_le_bytes([
        name[first],
        name[first + 1],
        name[first + 2],
        name[first + 3],
    ])
}

/// Vendor string is stored in ebx, edx, ecx
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn is_manufacturer(ebx: u32, ecx: u32, edx: u32, name: &[u8; 12]) -> bool {
    ebx == four_cc(name, 0) && edx == four_cc(name, 4) && ecx == four_cc(name, 8)
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub fn get() -> (CpuManufacturer, InstructionSet) {
    let mut manufacturer = CpuManufacturer::Unknown;
    let mut set = InstructionSet::X86;

    // cpuid is available on every x86_64 and on any x86 able to run sse code
    let leaf0 = unsafe { __cpuid(0) };
    if leaf0.eax != 0 {
        if is_manufacturer(leaf0.ebx, leaf0.ecx, leaf0.edx, b"GenuineIntel") {
            manufacturer = CpuManufacturer::Intel;
        } else if is_manufacturer(leaf0.ebx, leaf0.ecx, leaf0.edx, b"AuthenticAMD")
            || is_manufacturer(leaf0.ebx, leaf0.ecx, leaf0.edx, b"AMDisbetter!")
        {
            manufacturer = CpuManufacturer::Amd;
        }

        let leaf1 = unsafe { __cpuid(1) };
        if (leaf1.edx & SSE2_BIT) != 0 && (leaf1.ecx & SSSE3_BIT) != 0 {
            set = InstructionSet::Ssse3;
        }
    }

    (manufacturer, set)
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
pub fn get() -> (CpuManufacturer, InstructionSet) {
    (CpuManufacturer::Unknown, InstructionSet::X86)
}
