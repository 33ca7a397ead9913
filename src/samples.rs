/*
 * keil2sdcc: convert Keil C51 register headers to SDCC syntax.
 * Copyright (C) 2022  Ruifeng Xie
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

//! Sample headers for testing.

use indoc::indoc;

/// A trimmed-down Keil C51 `CH559.H`.
pub const CH559: &str = indoc! {r#"
    /* Define for CH559                                                         */
    /* Website:  http://wch.cn                                                  */
    /* Author:   W.ch 2014.09                                                   */

    #ifndef __BASE_TYPE__
    #define __BASE_TYPE__

    #ifdef __cplusplus
    extern "C" {
    #endif

    /*----- constant and type define -----------------------------------------*/

    #ifndef TRUE
    #define TRUE    1
    #define FALSE   0
    #endif

    #ifndef BOOL
    typedef bit                             BOOL;
    #endif
    #ifndef UINT8
    typedef unsigned char                   UINT8;
    #endif
    #ifndef UINT8D
    typedef unsigned char  data             UINT8D;
    #endif
    #ifndef UINT8X
    typedef unsigned char  xdata            UINT8X;
    #endif
    #ifndef UINT8XV
    typedef unsigned char volatile  xdata   UINT8XV;
    #endif
    #ifndef PUINT8C
    typedef const unsigned char code        *PUINT8C;  // code pointer
    #endif

    #ifdef __cplusplus
    }
    #endif

    #endif  // __BASE_TYPE__

    #ifndef __CH559_H__
    #define __CH559_H__

    /*----- SFR --------------------------------------------------------------*/
    /*  sbit are bit addressable, others are byte addressable */
    // bit variables are declared with sbit

    /*  System Registers  */
    sfr PSW             = 0xD0;         // program status word
     sbit CY            = PSW^7;        // carry flag
     sbit RS0           = PSW^3;        // register R0-R7 bank selection low bit
    sfr16 DPTR          = 0x82;         // DPTR pointer, little-endian
    sbit EA_LATE        = IE_LATE^7;
    sbit MISSING        = NOWHERE^2;    // base never declared

    /*  xdata SFR  */
    EXTERN  UINT8XV  PORT_CFG   _AT_ 0x21C1;   // port config
    EXTERN  volatile unsigned char  xRAM_A  _AT_ 0x2a00;

    sfr IE_LATE         = 0xa8;         // declared after use

    #endif  // __CH559_H__
"#};

/// [`CH559`] rewritten for SDCC, without the banner.
pub const CH559_SDCC: &str = indoc! {r#"
    /* Define for CH559                                                         */
    /* Website:  http://wch.cn                                                  */
    /* Author:   W.ch 2014.09                                                   */

    #ifndef __BASE_TYPE__

    #ifdef __SDCC__
    #define data  __data
    #define idata __idata
    #define xdata __xdata
    #define pdata __pdata
    #define code  __code
    #endif

    #define __BASE_TYPE__

    #ifdef __cplusplus
    extern "C" {
    #endif

    /*----- constant and type define -----------------------------------------*/

    #ifndef TRUE
    #define TRUE    1
    #define FALSE   0
    #endif

    #ifndef BOOL
    typedef __bit                             BOOL;
    #endif
    #ifndef UINT8
    typedef unsigned char                   UINT8;
    #endif
    #ifndef UINT8D
    typedef unsigned char UINT8D;
    #endif
    #ifndef UINT8X
    typedef unsigned char UINT8X;
    #endif
    #ifndef UINT8XV
    typedef unsigned char volatile UINT8XV;
    #endif
    #ifndef PUINT8C
    typedef const unsigned char *PUINT8C; // code pointer
    #endif

    #ifdef __cplusplus
    }
    #endif

    #endif  // __BASE_TYPE__

    #ifndef __CH559_H__
    #define __CH559_H__

    /*----- SFR --------------------------------------------------------------*/
    /*  sbit are __bit addressable, others are byte addressable */
    // bit variables are declared with sbit

    /*  System Registers  */
    __sfr __at (0xD0) PSW;         // program status word
     __sbit __at (0xD7) CY;        // carry flag
     __sbit __at (0xD3) RS0;        // register R0-R7 bank selection low __bit
    __sfr16 __at (0x8382) DPTR;         // DPTR pointer, little-endian
    __sbit __at (0xAF) EA_LATE;
    sbit MISSING        = NOWHERE^2;    // base never declared

    /*  xdata SFR  */
    extern UINT8XV __at (0x21C1) PORT_CFG;   // port config
    extern volatile unsigned char __at (0x2A00) xRAM_A;

    __sfr __at (0xA8) IE_LATE;         // declared after use

    #endif  // __CH559_H__
"#};
